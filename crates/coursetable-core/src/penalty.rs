//! Soft constraint weights.

/// Weights of the soft penalties.
///
/// The total cost always includes late hours, isolated days and four
/// consecutive hours. Room size, not-home and distance terms only count
/// when enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyWeights {
    /// Cost of one event in the last two hours of a day
    pub late_hour: f64,
    /// Cost per kilometre between a room and a curriculum's home site
    pub kilometer: f64,
    /// Cost per curriculum taught away from its home site
    pub not_home: f64,
    pub include_room_size: bool,
    pub include_not_home: bool,
    pub include_distance: bool,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            late_hour: 1.0,
            kilometer: 0.0,
            not_home: 0.0,
            include_room_size: false,
            include_not_home: false,
            include_distance: false,
        }
    }
}
