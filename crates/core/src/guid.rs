//! Media item GUIDs.
//!
//! A GUID is the opaque string clients use to address one media item across
//! both content types, mainly in batch operations (bulk tagging, gallery
//! membership edits). Format: a kind prefix (`i` / `v`) followed by the row
//! id in zero-padded lowercase hex, e.g. `i0000002a`.

use crate::error::CoreError;
use crate::media::MediaKind;
use crate::types::DbId;

/// Minimum hex digits in an encoded GUID. Ids wider than this simply use
/// more digits; decoding accepts any width.
const PAD_WIDTH: usize = 8;

/// Encode a kind + row id into a GUID string.
pub fn encode(kind: MediaKind, id: DbId) -> String {
    format!("{}{:0width$x}", kind.guid_prefix(), id, width = PAD_WIDTH)
}

/// Parse a GUID back into its kind and row id.
///
/// Fails with a validation error on an unknown prefix, an empty or
/// non-hex id part, or an id that is not a positive i64.
pub fn parse(guid: &str) -> Result<(MediaKind, DbId), CoreError> {
    let malformed = || CoreError::Validation(format!("Malformed guid '{guid}'"));

    let mut chars = guid.chars();
    let kind = match chars.next() {
        Some('i') => MediaKind::Image,
        Some('v') => MediaKind::Video,
        _ => return Err(malformed()),
    };

    let hex = chars.as_str();
    if hex.is_empty() {
        return Err(malformed());
    }

    let id = DbId::from_str_radix(hex, 16).map_err(|_| malformed())?;
    if id <= 0 {
        return Err(malformed());
    }

    Ok((kind, id))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    #[test]
    fn encode_pads_to_eight_digits() {
        assert_eq!(encode(MediaKind::Image, 42), "i0000002a");
        assert_eq!(encode(MediaKind::Video, 7), "v00000007");
    }

    #[test]
    fn encode_wide_ids_grow_past_padding() {
        assert_eq!(encode(MediaKind::Image, 0x1_0000_0000), "i100000000");
    }

    #[test]
    fn parse_round_trips() {
        for kind in [MediaKind::Image, MediaKind::Video] {
            for id in [1, 42, 0xdead_beef, i64::MAX] {
                assert_eq!(parse(&encode(kind, id)).unwrap(), (kind, id));
            }
        }
    }

    #[test]
    fn parse_rejects_unknown_prefix() {
        assert_matches!(parse("x0000002a"), Err(CoreError::Validation(_)));
        assert_matches!(parse(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_bad_id_part() {
        assert_matches!(parse("i"), Err(CoreError::Validation(_)));
        assert_matches!(parse("izzzz"), Err(CoreError::Validation(_)));
        assert_matches!(parse("i00000000"), Err(CoreError::Validation(_)));
        // Overflows i64.
        assert_matches!(parse("iffffffffffffffff"), Err(CoreError::Validation(_)));
    }
}
