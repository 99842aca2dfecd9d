//! Month-over-month trend computation

use serde::{Deserialize, Serialize};

/// Direction of a KPI change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Computed trend between a KPI value and its prior-month value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Absolute change (value - previous_value)
    pub delta: f64,
    /// Percentage change, None when the previous value is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

/// Compare a KPI value against its previous value
///
/// Direction is always computable from the sign comparison alone; the
/// percentage is guarded against division by zero.
pub fn compute_trend(value: f64, previous_value: f64) -> Trend {
    let direction = if value > previous_value {
        TrendDirection::Up
    } else if value < previous_value {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    };

    let delta = value - previous_value;
    let percent = if previous_value == 0.0 {
        None
    } else {
        Some(delta / previous_value * 100.0)
    };

    Trend {
        direction,
        delta,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth() {
        let t = compute_trend(92.0, 85.0);
        assert_eq!(t.direction, TrendDirection::Up);
        assert_eq!(t.delta, 7.0);
        let pct = t.percent.unwrap();
        assert!((pct - 8.235).abs() < 0.01, "got {pct}");
    }

    #[test]
    fn test_flat() {
        let t = compute_trend(85.0, 85.0);
        assert_eq!(t.direction, TrendDirection::Flat);
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.percent, Some(0.0));
    }

    #[test]
    fn test_drop() {
        let t = compute_trend(4200.0, 5000.0);
        assert_eq!(t.direction, TrendDirection::Down);
        assert_eq!(t.delta, -800.0);
        assert!((t.percent.unwrap() + 16.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_previous_guards_percent() {
        let t = compute_trend(10.0, 0.0);
        assert_eq!(t.direction, TrendDirection::Up);
        assert_eq!(t.delta, 10.0);
        assert_eq!(t.percent, None);

        let t = compute_trend(-3.0, 0.0);
        assert_eq!(t.direction, TrendDirection::Down);
        assert_eq!(t.percent, None);
    }
}
