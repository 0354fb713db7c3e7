//! Stream option encoding
//!
//! Stream options are five binary flags. Each position has a fixed pair of
//! tokens; a flag value of `0` selects the first token and `1` the second.
//!
//! | Position | `0`         | `1`           |
//! |----------|-------------|---------------|
//! | 0        | ownersubmit | allsubmit     |
//! | 1        | locked      | unlocked      |
//! | 2        | toparent    | notoparent    |
//! | 3        | fromparent  | nofromparent  |
//! | 4        | mergeany    | mergedown     |

use p4stream_utils::error::StreamError;

/// Number of option flags a stream carries.
pub const OPTION_COUNT: usize = 5;

/// Token pairs, indexed by position then flag value.
pub const OPTION_TOKENS: [[&str; 2]; OPTION_COUNT] = [
    ["ownersubmit", "allsubmit"],
    ["locked", "unlocked"],
    ["toparent", "notoparent"],
    ["fromparent", "nofromparent"],
    ["mergeany", "mergedown"],
];

pub const SUBMIT: usize = 0;
pub const LOCK: usize = 1;
pub const TO_PARENT: usize = 2;
pub const FROM_PARENT: usize = 3;
pub const MERGE: usize = 4;

/// Options given to new streams before any override is applied.
pub const DEFAULT_OPTIONS: &str = "allsubmit unlocked toparent fromparent mergedown";

/// Baseline for virtual streams, which never flow changes to or from a parent.
pub const VIRTUAL_OPTIONS: &str = "allsubmit unlocked notoparent nofromparent mergedown";

/// Turn off parent flow in both directions.
///
/// Vectors with three or fewer entries are left untouched.
pub fn force_virtual_flow(vector: &mut [u8]) {
    if vector.len() > FROM_PARENT {
        vector[TO_PARENT] = 1;
        vector[FROM_PARENT] = 1;
    }
}

/// Encode a five-flag vector into the space-separated token string.
///
/// For virtual streams the parent-flow flags are forced to `1` on a copy;
/// the caller's slice is never modified.
///
/// # Errors
///
/// [`StreamError::InvalidArity`] when the vector does not have exactly five
/// entries, [`StreamError::InvalidOptionValue`] when an entry is not 0 or 1.
pub fn encode_options(vector: &[u8], virtual_stream: bool) -> Result<String, StreamError> {
    if vector.len() != OPTION_COUNT {
        return Err(StreamError::InvalidArity {
            expected: OPTION_COUNT,
            actual: vector.len(),
        });
    }

    let mut flags = vector.to_vec();
    if virtual_stream {
        force_virtual_flow(&mut flags);
    }

    let tokens = flags
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            OPTION_TOKENS[index]
                .get(usize::from(value))
                .copied()
                .ok_or_else(|| StreamError::InvalidOptionValue {
                    index,
                    value: value.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tokens.join(" "))
}

/// Parse a flag vector from command-line text such as `1,1,0,0,1`.
///
/// Commas and whitespace both separate entries. The length is not checked
/// here; [`encode_options`] does that.
pub fn parse_option_vector(text: &str) -> Result<Vec<u8>, StreamError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(index, part)| match part {
            "0" => Ok(0),
            "1" => Ok(1),
            other => Err(StreamError::InvalidOptionValue {
                index,
                value: other.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_default_vector() {
        assert_eq!(
            encode_options(&[1, 1, 0, 0, 1], false).unwrap(),
            DEFAULT_OPTIONS
        );
    }

    #[test]
    fn test_encode_all_zero_and_all_one() {
        assert_eq!(
            encode_options(&[0, 0, 0, 0, 0], false).unwrap(),
            "ownersubmit locked toparent fromparent mergeany"
        );
        assert_eq!(
            encode_options(&[1, 1, 1, 1, 1], false).unwrap(),
            "allsubmit unlocked notoparent nofromparent mergedown"
        );
    }

    #[test]
    fn test_virtual_forces_parent_flow_off() {
        assert_eq!(
            encode_options(&[0, 1, 0, 0, 0], true).unwrap(),
            "ownersubmit unlocked notoparent nofromparent mergeany"
        );
        assert_eq!(encode_options(&[1, 1, 0, 0, 1], true).unwrap(), VIRTUAL_OPTIONS);
    }

    #[test]
    fn test_virtual_forcing_leaves_input_untouched() {
        let vector = vec![0, 0, 0, 0, 0];
        encode_options(&vector, true).unwrap();
        assert_eq!(vector, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_arity_is_checked_before_forcing() {
        for vector in [vec![], vec![1, 1, 0, 0], vec![1, 1, 0, 0, 1, 1]] {
            for virtual_stream in [false, true] {
                match encode_options(&vector, virtual_stream) {
                    Err(StreamError::InvalidArity { expected, actual }) => {
                        assert_eq!(expected, 5);
                        assert_eq!(actual, vector.len());
                    }
                    other => panic!("expected InvalidArity, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_arity_message() {
        let err = encode_options(&[1, 1], false).unwrap_err();
        assert_eq!(err.to_string(), "options count is invalid, must be '5' (got 2)");
    }

    #[test]
    fn test_out_of_range_value() {
        match encode_options(&[1, 1, 2, 0, 1], false) {
            Err(StreamError::InvalidOptionValue { index, value }) => {
                assert_eq!(index, 2);
                assert_eq!(value, "2");
            }
            other => panic!("expected InvalidOptionValue, got {other:?}"),
        }
    }

    #[test]
    fn test_virtual_forcing_masks_out_of_range_parent_flags() {
        // Forced positions are overwritten before lookup
        assert_eq!(
            encode_options(&[1, 1, 7, 9, 1], true).unwrap(),
            VIRTUAL_OPTIONS
        );
    }

    #[test]
    fn test_force_virtual_flow_ignores_short_vectors() {
        let mut short = [0, 0, 0];
        force_virtual_flow(&mut short);
        assert_eq!(short, [0, 0, 0]);

        let mut four = [0, 0, 0, 0];
        force_virtual_flow(&mut four);
        assert_eq!(four, [0, 0, 1, 1]);

        let mut full = [0, 0, 0, 0, 0];
        force_virtual_flow(&mut full);
        assert_eq!(full, [0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_parse_option_vector() {
        assert_eq!(parse_option_vector("1,1,0,0,1").unwrap(), vec![1, 1, 0, 0, 1]);
        assert_eq!(parse_option_vector("1 0 1").unwrap(), vec![1, 0, 1]);
        assert_eq!(parse_option_vector(" 0, 1 ,").unwrap(), vec![0, 1]);
        assert!(parse_option_vector("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_option_vector_rejects_non_binary() {
        match parse_option_vector("1,yes,0") {
            Err(StreamError::InvalidOptionValue { index, value }) => {
                assert_eq!(index, 1);
                assert_eq!(value, "yes");
            }
            other => panic!("expected InvalidOptionValue, got {other:?}"),
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cli_vectors_parse_and_encode(vector in prop::collection::vec(0u8..=1, OPTION_COUNT), sep in "[, ]") {
                let text = vector
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(&sep);

                let parsed = parse_option_vector(&text).unwrap();
                prop_assert_eq!(&parsed, &vector);
                prop_assert_eq!(encode_options(&parsed, false).unwrap().split(' ').count(), OPTION_COUNT);
            }
        }
    }
}
