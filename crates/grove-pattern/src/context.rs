use grove_tree::{NodeId, TreeAdaptor, Vocabulary};

use crate::PatternError;
use crate::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step<'a> {
    Name(&'a str),
    Ellipsis,
}

/// Whether the ancestors of `node` fit `context`, a list of token names
/// read outward from the parent: `"PRINT VEC"` means the parent is a `VEC`
/// whose own parent is a `PRINT`.
///
/// `...` skips any number of ancestors. It may open or close the context,
/// where it is a no-op, and appear at most once between names.
pub fn in_context<A: TreeAdaptor>(
    adaptor: &A,
    vocabulary: &Vocabulary,
    node: NodeId,
    context: &str,
) -> Result<bool, PatternError> {
    let steps = steps(context)?;
    let name_of = |node: NodeId| vocabulary.name(adaptor.kind(node));

    let mut current = adaptor.parent(node);
    let mut remaining = steps.len();
    while remaining > 0 {
        let Some(mut tree) = current else { break };
        let mut expected = steps[remaining - 1];
        if expected == Step::Ellipsis {
            if remaining == 1 {
                return Ok(true);
            }
            let Step::Name(goal) = steps[remaining - 2] else {
                return Err(PatternError::DoubledEllipsis);
            };
            let Some(ancestor) = std::iter::successors(Some(tree), |&tree| adaptor.parent(tree))
                .find(|&tree| name_of(tree) == Some(goal))
            else {
                return Ok(false);
            };
            tree = ancestor;
            remaining -= 1;
            expected = Step::Name(goal);
        }

        if Step::Name(name_of(tree).unwrap_or_default()) != expected {
            return Ok(false);
        }
        remaining -= 1;
        current = adaptor.parent(tree);
    }

    Ok(remaining == 0 || steps[..remaining] == [Step::Ellipsis])
}

fn steps(context: &str) -> Result<Vec<Step<'_>>, PatternError> {
    let mut cursor = Cursor::new(context);
    let mut steps = Vec::new();
    loop {
        cursor.advance_while(char::is_whitespace);
        if cursor.is_eof() {
            break;
        }
        let step = if cursor.peek() == '.' {
            let dots = cursor.advance_while(|ch| ch == '.');
            if dots != "..." {
                return Err(PatternError::MalformedEllipsis { dots: dots.into() });
            }
            Step::Ellipsis
        } else {
            Step::Name(cursor.advance_while(|ch| !ch.is_whitespace() && ch != '.'))
        };
        if step == Step::Ellipsis && steps.last() == Some(&Step::Ellipsis) {
            return Err(PatternError::DoubledEllipsis);
        }
        steps.push(step);
    }

    let interior = steps.iter().enumerate().filter(|&(index, step)| {
        *step == Step::Ellipsis && index != 0 && index + 1 != steps.len()
    });
    if interior.count() > 1 {
        return Err(PatternError::TooManyEllipses);
    }
    Ok(steps)
}
