/// Interactions as a percentage of reach.
pub fn calculate_engagement_rate(interactions: f64, reach: f64) -> f64 {
    if reach == 0.0 {
        return 0.0;
    }
    round2(interactions / reach * 100.0)
}

pub fn calculate_follower_like_ratio(total_likes: f64, followers: f64) -> f64 {
    if followers == 0.0 {
        return 0.0;
    }
    round2(total_likes / followers)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100` without rounding, zero when `whole` is zero.
pub(crate) fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
