use chrono::{NaiveDateTime, NaiveTime};

/// Which daily window an instant falls into, relative to the two
/// scheduled time points of one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleWindow {
    /// Strictly after the earlier point, before the later one.
    EarlierToday,
    /// At or after the later point.
    LaterToday,
    /// At or before the earlier point: the previous day's later value
    /// is still in effect.
    LaterYesterday,
}

/// The replica count in force at one instant, and the window it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDecision {
    pub window: ScaleWindow,
    pub replicas: u32,
}

/// Decide the replica count required at `now`, given the scale-up and
/// scale-down points as (time of day, value) pairs.
///
/// Both points are placed on `now`'s calendar date. Their ordering within
/// the day is arbitrary; the later point's value persists overnight until
/// the next day's earlier point has passed. Boundary instants are
/// asymmetric and must stay that way: exactly at the earlier time the
/// previous day's later value still holds, exactly at the later time the
/// later value is already in force.
pub fn required_replicas(
    now: NaiveDateTime,
    scale_up: (NaiveTime, u32),
    scale_down: (NaiveTime, u32),
) -> WindowDecision {
    let date = now.date();
    let up_at = date.and_time(scale_up.0);
    let down_at = date.and_time(scale_down.0);

    let ((earlier_at, earlier_value), (later_at, later_value)) = if up_at < down_at {
        ((up_at, scale_up.1), (down_at, scale_down.1))
    } else {
        ((down_at, scale_down.1), (up_at, scale_up.1))
    };

    let window = if now >= later_at {
        ScaleWindow::LaterToday
    } else if now > earlier_at {
        ScaleWindow::EarlierToday
    } else {
        ScaleWindow::LaterYesterday
    };

    let replicas = match window {
        ScaleWindow::EarlierToday => earlier_value,
        ScaleWindow::LaterToday | ScaleWindow::LaterYesterday => later_value,
    };

    WindowDecision { window, replicas }
}
