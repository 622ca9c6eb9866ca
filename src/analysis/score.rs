/// Compatibility percentage from matched and missing skill counts.
///
/// `round(100 * matches / (matches + gaps))`, rounding halves up; 0 when
/// both counts are zero. Extra skills never count.
pub fn score(match_count: u64, gap_count: u64) -> u8 {
    let total = match_count as u128 + gap_count as u128;
    if total == 0 {
        return 0;
    }
    let scaled = 100 * match_count as u128;
    ((2 * scaled + total) / (2 * total)) as u8
}
