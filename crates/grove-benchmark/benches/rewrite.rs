use std::hint::black_box;

use codspeed_criterion_compat::{BenchmarkId, Criterion, criterion_group, criterion_main};
use grove_rewrite::{Atom, Rewrite, RewriteStreams, Template, rewrite};
use grove_tree::{CommonTreeAdaptor, Token, TokenKind, TreeAdaptor as _, Vocabulary};

const ID: TokenKind = TokenKind::new(4);
const INT: TokenKind = TokenKind::new(5);
const VAR: TokenKind = TokenKind::new(6);
const DECLS: TokenKind = TokenKind::new(7);

fn benchmark_rewrite(c: &mut Criterion) {
    let vocabulary = Vocabulary::with_user_tokens(["ID", "INT", "VAR", "DECLS"]);
    // ^(DECLS ^(VAR ID INT)+)
    let clause = Rewrite::new(vec![Template::tree(Atom::imaginary(DECLS), vec![
        Template::one_or_more(vec![Template::tree(Atom::imaginary(VAR), vec![
            Template::label("ID"),
            Template::label("INT"),
        ])]),
    ])]);

    let mut group = c.benchmark_group("Rewrite Benchmark");

    for count in [1, 16, 256] {
        group.bench_with_input(BenchmarkId::new("declarations", count), &count, |b, &count| {
            b.iter(|| {
                let mut adaptor = CommonTreeAdaptor::new();
                let mut streams = RewriteStreams::new();
                for index in 0..count {
                    streams.token_stream("ID").add_token(Token::synthetic(ID, format!("v{index}")));
                    streams.token_stream("INT").add_token(Token::synthetic(INT, index.to_string()));
                }
                let tree = rewrite(&mut adaptor, &vocabulary, &mut streams, &clause).unwrap();
                black_box(tree.map(|tree| adaptor.child_count(tree)));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rewrite);
criterion_main!(benches);
