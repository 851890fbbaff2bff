/*
 * Pincer, the core of a UCI-compatible chess engine
 * Copyright (C) 2025 the Pincer developers
 *
 * Pincer is free software: you can redistribute it and/or modify it under
 * the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * Pincer is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
 * FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
 * details.
 *
 * You should have received a copy of the GNU General Public License along
 * with Pincer. If not, see <https://www.gnu.org/licenses/>.
 */

use std::time::{Duration, Instant};

use super::{Depth, Limits};

impl Limits {
    /// The maximum number of effective moves to go until the next time
    /// control.
    ///
    /// In other words, the time manager treats the moves until the next
    /// time control as `moves_to_go.min(MAX_MOVES_TO_GO)`.
    const MAX_MOVES_TO_GO: Depth = 40;
}

/// Calculates the window of time the search may use.
///
/// A fixed move time is used as-is; clock-and-increment limits allocate an
/// even share of the remaining time, assuming a sudden-death control lasts
/// at most another forty moves. Every other limit gets an unbounded
/// window.
pub fn calculate_time_window(limits: Limits, start: Instant) -> Duration {
    match limits {
        Limits::Timed {
            time,
            inc,
            moves_to_go,
        } => {
            let moves_to_go = moves_to_go.clamp(1, Limits::MAX_MOVES_TO_GO);
            (time / u32::from(moves_to_go) + inc).saturating_sub(start.elapsed())
        }
        Limits::Movetime(movetime) => movetime,
        Limits::Depth(_) | Limits::Nodes(_) | Limits::Infinite => Duration::MAX,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{calculate_time_window, Limits};

    #[test]
    fn timed_limits_share_the_clock() {
        let start = Instant::now();

        // 40 seconds, 40 moves to go: one second per move
        let limits = Limits::Timed {
            time: Duration::from_secs(40),
            inc: Duration::ZERO,
            moves_to_go: 40,
        };
        let window = calculate_time_window(limits, start);
        assert!(window <= Duration::from_secs(1));
        assert!(window > Duration::from_millis(900));

        // sudden death is treated as forty moves to go
        let limits = Limits::new_timed(Duration::from_secs(80));
        let window = calculate_time_window(limits, start);
        assert!(window <= Duration::from_secs(2));
        assert!(window > Duration::from_millis(1900));

        // a fixed move time is used as-is
        let limits = Limits::Movetime(Duration::from_millis(123));
        assert_eq!(calculate_time_window(limits, start), Duration::from_millis(123));

        // depth-limited searches are not time-bounded
        assert_eq!(
            calculate_time_window(Limits::Depth(5), start),
            Duration::MAX
        );
    }
}
