use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use grove_nav::TreeNodeStream;
use grove_tree::{CommonTreeAdaptor, NodeId, Token, TokenKind, TreeAdaptor as _};

const NODE: TokenKind = TokenKind::new(4);

/// A complete tree with `fanout` children per node, `depth` levels deep.
fn build(adaptor: &mut CommonTreeAdaptor, fanout: usize, depth: usize) -> NodeId {
    let root = adaptor.create(Token::synthetic(NODE, depth.to_string()));
    if depth > 0 {
        for _ in 0..fanout {
            let child = build(adaptor, fanout, depth - 1);
            adaptor.add_child(root, child);
        }
    }
    root
}

fn benchmark_navigation(c: &mut Criterion) {
    let shapes = [("wide", 64, 2), ("deep", 2, 10), ("bushy", 6, 4)];

    let mut group = c.benchmark_group("Navigation Benchmark");

    for (name, fanout, depth) in shapes {
        let mut adaptor = CommonTreeAdaptor::new();
        let root = build(&mut adaptor, fanout, depth);
        let len = TreeNodeStream::new(&adaptor, root).len();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("consume", name), &root, |b, &root| {
            b.iter(|| {
                let mut stream = TreeNodeStream::new(&adaptor, root);
                while stream.la(1) != TokenKind::EOF {
                    stream.consume();
                }
                black_box(stream.index());
            });
        });

        group.bench_with_input(BenchmarkId::new("push_pop", name), &root, |b, &root| {
            let mut stream = TreeNodeStream::new(&adaptor, root);
            let middle = stream.len() / 2;
            b.iter(|| {
                stream.push(middle).unwrap();
                stream.consume();
                black_box(stream.pop().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_navigation);
criterion_main!(benches);
