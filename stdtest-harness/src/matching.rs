//! Matching of captured output against expected fragments.
//!
//! Matching is literal substring containment: case-sensitive, with no
//! whitespace or line-ending normalization.

use crate::error::FragmentNotFound;

/// Checks that every fragment appears somewhere in `output`, in any order.
///
/// Fragments are checked in list order so that the reported failure is the
/// first missing fragment.
pub fn match_unordered<S: AsRef<str>>(
    output: &str,
    fragments: &[S],
) -> Result<(), FragmentNotFound> {
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if !output.contains(fragment) {
            tracing::debug!(target: "matching", "fragment {fragment:?} not found");
            return Err(not_found(output, fragment, false));
        }
    }

    Ok(())
}

/// Checks that the fragments appear in `output` in list order.
///
/// Each fragment is searched for starting where the previous match ended, so a
/// fragment that only occurs before an earlier fragment's match is absent.
pub fn match_ordered<S: AsRef<str>>(
    output: &str,
    fragments: &[S],
) -> Result<(), FragmentNotFound> {
    let mut cursor = 0;

    for fragment in fragments {
        let fragment = fragment.as_ref();

        // The cursor always lands on the end of a previous match, which is a char boundary.
        let found = output
            .get(cursor..)
            .and_then(|remaining| remaining.find(fragment));

        let Some(offset) = found else {
            tracing::debug!(
                target: "matching",
                "fragment {fragment:?} not found at or after {cursor}"
            );
            return Err(not_found(output, fragment, true));
        };

        cursor += offset + fragment.len();
        tracing::trace!(target: "matching", "fragment {fragment:?} matched; cursor at {cursor}");
    }

    Ok(())
}

/// Matches `output` against `fragments` with ordered or unordered semantics.
pub fn match_output<S: AsRef<str>>(
    output: &str,
    fragments: &[S],
    ordered: bool,
) -> Result<(), FragmentNotFound> {
    if ordered {
        match_ordered(output, fragments)
    } else {
        match_unordered(output, fragments)
    }
}

fn not_found(output: &str, fragment: &str, ordered: bool) -> FragmentNotFound {
    FragmentNotFound {
        fragment: fragment.to_owned(),
        output: output.to_owned(),
        ordered,
    }
}
