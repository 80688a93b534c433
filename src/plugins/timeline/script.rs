//! The scripted encounter.
//!
//! Written against a running step cursor: every directive first advances the
//! cursor by its `after` amount (0 = same step as the previous directive).

use crate::common::screen::ScreenBounds;
use crate::plugins::enemies::EnemyKind::{self, Big, Bomber, Gray, Green, Red, SmallShip};
use crate::plugins::movement::Direction::{self, Down, Left, Right, Up};

use super::{Wave, WaveDirective};

#[derive(Default)]
struct Script {
    cursor: u64,
    directives: Vec<WaveDirective>,
}

/// Wave template; the builder stamps the tick.
fn wave(speed: f32, lane: f32, direction: Direction, kind: EnemyKind) -> Wave {
    Wave { tick: 0, lane, speed, direction, kind }
}

impl Script {
    fn advance(&mut self, after: u64, mut wave: Wave) -> Wave {
        self.cursor += after;
        wave.tick = self.cursor;
        wave
    }

    fn single(&mut self, after: u64, wave: Wave) {
        let wave = self.advance(after, wave);
        self.directives.push(WaveDirective::Single(wave));
    }

    fn row(&mut self, after: u64, count: u32, wave: Wave, delay: Option<u64>, offset: Option<f32>) {
        let wave = self.advance(after, wave);
        self.directives.push(WaveDirective::Row { count, wave, delay, offset });
    }

    /// Four spawns in the same step, one from each edge, crossing the centre.
    fn cross(&mut self, after: u64, speed: f32, kind: EnemyKind, mid_x: f32, mid_y: f32) {
        self.single(after, wave(speed, mid_y, Left, kind));
        self.single(0, wave(speed, mid_y, Right, kind));
        self.single(0, wave(speed, mid_x, Down, kind));
        self.single(0, wave(speed, mid_x, Up, kind));
    }
}

pub fn encounter(screen: &ScreenBounds) -> Vec<WaveDirective> {
    let mid_x = screen.width / 2.0;
    let mid_y = screen.height / 2.0;
    let mut s = Script::default();

    // Opening: lone planes from the sides.
    s.single(10, wave(40.0, 10.0, Left, Green));
    s.single(10, wave(40.0, 30.0, Right, Green));
    s.single(20, wave(60.0, 70.0, Right, Red));
    s.single(0, wave(60.0, 90.0, Left, Red));
    s.single(50, wave(80.0, 30.0, Left, Gray));
    s.single(20, wave(30.0, 60.0, Down, Big));

    s.row(30, 3, wave(50.0, 50.0, Left, Green), None, None);
    s.row(30, 4, wave(80.0, 10.0, Right, Red), Some(2), Some(10.0));
    s.row(30, 3, wave(30.0, 40.0, Down, Big), Some(4), Some(20.0));
    s.row(30, 2, wave(30.0, 40.0, Down, Green), Some(4), Some(0.0));

    s.single(30, wave(5.0, 50.0, Down, SmallShip));
    s.single(10, wave(5.0, 100.0, Down, SmallShip));

    s.cross(80, 60.0, Red, mid_x, mid_y);

    // Curtains.
    s.row(30, 6, wave(15.0, 10.0, Down, Green), Some(0), Some(27.0));
    s.row(10, 6, wave(30.0, 10.0, Down, Red), Some(0), Some(27.0));
    s.row(10, 6, wave(80.0, 10.0, Down, Gray), Some(0), Some(27.0));

    s.single(30, wave(15.0, mid_x, Down, Bomber));
    s.single(100, wave(20.0, mid_x, Up, Bomber));

    s.cross(50, 20.0, Green, mid_x, mid_y);
    s.cross(30, 60.0, Gray, mid_x, mid_y);

    s.single(30, wave(5.0, 50.0, Up, SmallShip));
    s.single(10, wave(5.0, 100.0, Up, SmallShip));

    s.row(80, 2, wave(50.0, 50.0, Left, Green), None, None);
    s.row(20, 2, wave(50.0, 50.0, Right, Red), None, None);

    s.row(30, 3, wave(30.0, 40.0, Left, Gray), Some(4), Some(30.0));
    s.row(0, 3, wave(30.0, 25.0, Right, Gray), Some(4), Some(30.0));

    s.row(30, 3, wave(10.0, 60.0, Up, Big), None, Some(20.0));
    s.row(30, 3, wave(10.0, 60.0, Up, Big), None, Some(20.0));

    s.row(50, 3, wave(10.0, 20.0, Left, SmallShip), Some(0), Some(30.0));
    s.row(0, 3, wave(10.0, 30.0, Right, SmallShip), Some(0), Some(30.0));

    // Finale.
    s.row(120, 2, wave(10.0, 50.0, Down, Bomber), Some(25), Some(70.0));
    s.row(200, 3, wave(10.0, 25.0, Down, Bomber), Some(0), Some(54.0));

    s.row(50, 2, wave(70.0, 50.0, Down, Gray), Some(0), Some(60.0));
    s.single(7, wave(70.0, mid_x, Down, Gray));
    s.row(7, 2, wave(70.0, 50.0, Down, Gray), Some(0), Some(60.0));

    s.directives
}
