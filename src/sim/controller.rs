//! Turns player commands into movement, trap triggers and quiz progress.
//!
//! Everything that happens as a side effect of a step is reported back as
//! a [`MoveEvent`] so the caller can swap backgrounds, overlays and text
//! without the controller knowing about rendering.

use smallvec::SmallVec;

use super::collision::try_move;
use super::input::InputCmd;
use super::player::Player;
use super::traps::{TrapEntry, TrapTracker};
use crate::world::{
    AngleTable, AnswerSlot, Destination, Maze, QuestionId, QuestionTag, Scenario,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEvent {
    TrapEntered(TrapEntry),
    Teleported { destination: usize },
    QuestionActivated(QuestionId),
    Answered { question: QuestionId, slot: AnswerSlot },
}

pub type MoveEvents = SmallVec<[MoveEvent; 2]>;

pub struct PlayerController {
    tables: AngleTable,
    player: Player,
    traps: TrapTracker,
    active: Option<QuestionId>,
}

impl PlayerController {
    /// Place the player on `start` (normally destination 0).
    pub fn new(tables: &AngleTable, start: &Destination, speed: f32) -> Self {
        Self {
            player: Player::new(tables, start.pos, start.angle, speed),
            tables: tables.clone(),
            traps: TrapTracker::default(),
            active: None,
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Question whose answers are currently on show.
    #[inline]
    pub fn active_question(&self) -> Option<QuestionId> {
        self.active
    }

    #[inline]
    pub fn current_trap(&self) -> Option<usize> {
        self.traps.current()
    }

    pub fn rotate_left(&mut self) {
        let a10 = self.tables.arcs().a10;
        self.player.turn(&self.tables, -a10);
    }

    pub fn rotate_right(&mut self) {
        let a10 = self.tables.arcs().a10;
        self.player.turn(&self.tables, a10);
    }

    pub fn move_forward(&mut self, maze: &Maze, scenario: &Scenario) -> MoveEvents {
        self.step(1.0, maze, scenario)
    }

    pub fn move_backward(&mut self, maze: &Maze, scenario: &Scenario) -> MoveEvents {
        self.step(-1.0, maze, scenario)
    }

    /// Turn first, then step.
    pub fn apply(&mut self, cmd: InputCmd, maze: &Maze, scenario: &Scenario) -> MoveEvents {
        if cmd.turn > 0.0 {
            self.rotate_left();
        } else if cmd.turn < 0.0 {
            self.rotate_right();
        }

        if cmd.forward > 0.0 {
            self.move_forward(maze, scenario)
        } else if cmd.forward < 0.0 {
            self.move_backward(maze, scenario)
        } else {
            MoveEvents::new()
        }
    }

    fn step(&mut self, sign: f32, maze: &Maze, scenario: &Scenario) -> MoveEvents {
        let mut events = MoveEvents::new();

        let result = try_move(maze, self.player.pos, self.player.step_target(sign));
        if !result.moved() {
            return events;
        }
        self.player.pos = result.pos;

        if let Some(entry) =
            self.traps
                .check(&scenario.traps, scenario.destinations(), self.player.pos)
        {
            log::debug!("trap {} entered ({:?})", entry.index, entry.effects);
            events.push(MoveEvent::TrapEntered(entry));

            let target = scenario.traps[entry.index].destination;
            if let Some((index, dest)) =
                target.and_then(|i| scenario.destination(i).map(|d| (i, d)))
            {
                self.teleport(dest);
                events.push(MoveEvent::Teleported { destination: index });
            }
        }

        self.update_quiz(maze, &mut events);
        events
    }

    fn teleport(&mut self, dest: &Destination) {
        self.player.pos = dest.pos;
        if !dest.use_existing_angle {
            self.player.set_angle(&self.tables, dest.angle);
        }
    }

    /// Marks activate their question; an active answer closes it.
    fn update_quiz(&mut self, maze: &Maze, events: &mut MoveEvents) {
        let Some(idx) = self.player.tile(maze) else {
            return;
        };
        let markers = maze.markers();

        match markers.tag_at(idx, maze.book(), self.active) {
            Some(QuestionTag::Answer(slot)) => {
                if let Some(question) = self.active.take() {
                    log::debug!("question {} answered {}", question as char, slot.as_char());
                    events.push(MoveEvent::Answered { question, slot });
                }
            }
            Some(QuestionTag::Mark) => {
                let id = markers.question_at(idx);
                if id != self.active && id.is_some_and(|q| maze.book().get(q).is_some()) {
                    self.active = id;
                    events.extend(id.map(MoveEvent::QuestionActivated));
                }
            }
            None => {}
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::traps::TrapEffects;
    use crate::world::{BackgroundChange, Gradient, Trap};

    fn dest(x: f32, y: f32, angle: i32, keep_angle: bool) -> Destination {
        Destination {
            pos: Vec2::new(x, y),
            angle,
            use_existing_angle: keep_angle,
            background: BackgroundChange::Keep,
            landscape: None,
        }
    }

    fn tile_trap(col: f32, row: f32, destination: Option<usize>, overlay: Option<u16>) -> Trap {
        Trap {
            left: col * 64.0,
            right: col * 64.0 + 63.0,
            top: row * 64.0,
            bottom: row * 64.0 + 63.0,
            destination,
            overlay,
        }
    }

    fn setup(scenario: &Scenario) -> (AngleTable, PlayerController) {
        let t = AngleTable::new(320);
        let c = PlayerController::new(&t, scenario.start(), 16.0);
        (t, c)
    }

    #[test]
    fn rotation_is_ten_degrees_and_wraps() {
        let s = Scenario::start_only(dest(96.0, 96.0, 0, false));
        let (t, mut c) = setup(&s);
        let a = t.arcs();
        c.rotate_left();
        assert_eq!(c.player().angle, a.a360 - a.a10);
        c.rotate_right();
        c.rotate_right();
        assert_eq!(c.player().angle, a.a10);
    }

    #[test]
    fn walking_into_a_wall_slides_or_stops() {
        let m = Maze::demo();
        let s = Scenario::start_only(dest(96.0, 70.0, 0, false));
        let (t, mut c) = setup(&s);

        // north-east at 45°: y is blocked by the border, x goes through
        c.player.set_angle(&t, t.arcs().a270 + t.arcs().a45);
        c.move_forward(&m, &s);
        assert!(c.player().pos.x > 96.0);
        assert_eq!(c.player().pos.y, 70.0);

        // into the north-west corner: nothing changes
        c.player.pos = Vec2::new(70.0, 70.0);
        c.player.set_angle(&t, t.arcs().a180 + t.arcs().a45);
        c.move_forward(&m, &s);
        assert_eq!(c.player().pos, Vec2::new(70.0, 70.0));
    }

    #[test]
    fn standing_in_a_trap_fires_it_once() {
        let m = Maze::demo();
        let mut s = Scenario::start_only(dest(72.0, 96.0, 0, false));
        s.traps.push(tile_trap(2.0, 1.0, None, Some(4)));
        s.traps[0].left = 80.0;
        s.traps[0].right = 240.0;
        let (_, mut c) = setup(&s);

        let first = c.move_forward(&m, &s);
        assert_eq!(first.len(), 1);
        assert!(matches!(
            first[0],
            MoveEvent::TrapEntered(TrapEntry { index: 0, effects }) if effects == TrapEffects::OVERLAY
        ));
        for _ in 0..4 {
            assert!(c.move_forward(&m, &s).is_empty());
        }
        assert_eq!(c.current_trap(), Some(0));
    }

    #[test]
    fn teleport_can_keep_the_current_angle() {
        let m = Maze::demo();
        let mut s = Scenario::start_only(dest(176.0, 96.0, 0, false));
        s.push_destination(dest(416.0, 352.0, 480, true));
        s.push_destination(Destination {
            background: BackgroundChange::Gradient(Gradient::default()),
            ..dest(96.0, 416.0, 480, false)
        });
        s.traps.push(tile_trap(3.0, 1.0, Some(1), None));
        s.traps.push(tile_trap(6.0, 4.0, Some(2), None));
        let (t, mut c) = setup(&s);

        let ev = c.move_forward(&m, &s);
        assert_eq!(ev.len(), 2);
        assert_eq!(ev[1], MoveEvent::Teleported { destination: 1 });
        assert_eq!(c.player().pos, Vec2::new(416.0, 352.0));
        assert_eq!(c.player().angle, 0);

        // one step north into the second trap at (6, 4)
        c.player.pos = Vec2::new(416.0, 330.0);
        c.player.set_angle(&t, t.arcs().a270);
        let ev = c.move_forward(&m, &s);
        assert!(matches!(
            ev[0],
            MoveEvent::TrapEntered(TrapEntry { index: 1, effects })
                if effects == TrapEffects::TELEPORT | TrapEffects::BACKGROUND
        ));
        assert_eq!(ev[1], MoveEvent::Teleported { destination: 2 });
        assert_eq!(c.player().pos, Vec2::new(96.0, 416.0));
        assert_eq!(c.player().angle, 480);
    }

    #[test]
    fn quiz_activates_on_the_mark_and_closes_on_an_answer() {
        let m = Maze::demo();
        // question '1' sits on (2, 2); answer A is one tile up-left at (1, 1)
        let s = Scenario::start_only(dest(160.0, 120.0, 480, false));
        let (t, mut c) = setup(&s);

        let ev = c.move_forward(&m, &s);
        assert_eq!(ev.as_slice(), &[MoveEvent::QuestionActivated(b'1')]);
        assert_eq!(c.active_question(), Some(b'1'));

        // wandering on the mark itself changes nothing
        assert!(c.move_forward(&m, &s).is_empty());

        c.player.pos = Vec2::new(96.0, 112.0);
        c.player.set_angle(&t, t.arcs().a270);
        let ev = c.move_forward(&m, &s);
        assert_eq!(
            ev.as_slice(),
            &[MoveEvent::Answered {
                question: b'1',
                slot: AnswerSlot::A
            }]
        );
        assert_eq!(c.active_question(), None);

        // with no question active the same tile is plain floor
        c.player.pos = Vec2::new(96.0, 112.0);
        assert!(c.move_forward(&m, &s).is_empty());
    }

    #[test]
    fn commands_turn_then_step() {
        let m = Maze::demo();
        let s = Scenario::start_only(dest(96.0, 96.0, 0, false));
        let (t, mut c) = setup(&s);
        c.apply(
            InputCmd {
                forward: 1.0,
                turn: -1.0,
            },
            &m,
            &s,
        );
        assert_eq!(c.player().angle, t.arcs().a10);
        assert!(c.player().pos.x > 96.0 && c.player().pos.y > 96.0);

        let before = *c.player();
        c.apply(InputCmd::default(), &m, &s);
        assert_eq!(*c.player(), before);
    }
}
