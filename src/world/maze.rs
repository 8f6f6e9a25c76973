use glam::Vec2;

use crate::world::grid::{GridError, TileCode, TileGrid, TileIndex};
use crate::world::questions::{
    Question, QuestionBook, QuestionId, QuestionMarkers, QuestionTag,
};

/// The three aerial layers of one maze sharing a single coordinate system.
///
/// This is the only thing the ray caster and the collision code look at;
/// it is built once at load time and read-only afterwards.
#[derive(Clone, Debug)]
pub struct Maze {
    walls: TileGrid,
    props: TileGrid,
    markers: QuestionMarkers,
    book: QuestionBook,
}

impl Maze {
    /// Missing prop/question layers are treated as empty.
    pub fn new(
        walls: TileGrid,
        props: Option<TileGrid>,
        questions: Option<TileGrid>,
        book: QuestionBook,
    ) -> Result<Self, GridError> {
        let props = Self::layer_or_empty(&walls, props, "prop")?;
        let questions = Self::layer_or_empty(&walls, questions, "question")?;
        Ok(Self {
            walls,
            props,
            markers: QuestionMarkers::new(questions),
            book,
        })
    }

    fn layer_or_empty(
        walls: &TileGrid,
        layer: Option<TileGrid>,
        name: &'static str,
    ) -> Result<TileGrid, GridError> {
        match layer {
            Some(g) if g.same_shape(walls) => Ok(g),
            Some(g) => Err(GridError::ShapeMismatch {
                layer: name,
                found: (g.width(), g.height()),
                expected: (walls.width(), walls.height()),
            }),
            None => TileGrid::empty(walls.width(), walls.height()),
        }
    }

    /*──────────────────────── layers ─────────────────────────────────*/

    #[inline]
    pub fn walls(&self) -> &TileGrid {
        &self.walls
    }
    #[inline]
    pub fn props(&self) -> &TileGrid {
        &self.props
    }
    #[inline]
    pub fn markers(&self) -> &QuestionMarkers {
        &self.markers
    }
    #[inline]
    pub fn book(&self) -> &QuestionBook {
        &self.book
    }

    /*──────────────────────── grid accessor ──────────────────────────*/

    #[inline]
    pub fn width(&self) -> usize {
        self.walls.width()
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.walls.height()
    }
    #[inline]
    pub fn width_shift(&self) -> u32 {
        self.walls.width_shift()
    }

    #[inline]
    pub fn to_index(&self, col: i32, row: i32) -> Option<TileIndex> {
        self.walls.index_of(col, row)
    }

    #[inline]
    pub fn is_wall(&self, idx: TileIndex) -> bool {
        self.walls.is_occupied(idx)
    }

    #[inline]
    pub fn wall_code(&self, idx: TileIndex) -> TileCode {
        self.walls.code(idx)
    }

    #[inline]
    pub fn is_prop(&self, idx: TileIndex) -> bool {
        self.props.is_occupied(idx)
    }

    #[inline]
    pub fn prop_code(&self, idx: TileIndex) -> TileCode {
        self.props.code(idx)
    }

    /// Quiz marker rendered at `idx` while `active` is the current question.
    #[inline]
    pub fn question_type_at(
        &self,
        idx: TileIndex,
        active: Option<QuestionId>,
    ) -> Option<QuestionTag> {
        self.markers.visible_tag_at(idx, &self.book, active)
    }

    /// True if `p` lies on the grid and outside every wall.
    pub fn is_open(&self, p: Vec2) -> bool {
        self.walls.tile_at(p).is_some_and(|idx| !self.is_wall(idx))
    }

    /*──────────────────────── built-in demo ─────────────────────────*/

    /// The 8×8 demo maze: a bordered room with a few interior blocks,
    /// three props and three questions.
    pub fn demo() -> Self {
        const WALLS: [&str; 8] = [
            "11111111", "10000001", "10000001", "10000111", "10001101", "10000001", "10000001",
            "11111111",
        ];
        const PROPS: [&str; 8] = [
            "00000000", "00000000", "00000300", "00002010", "00000000", "00000000", "00000000",
            "00000000",
        ];
        const QUESTIONS: [&str; 8] = [
            "00000000", "00000000", "00100000", "00000000", "00000000", "00020000", "00000030",
            "00000000",
        ];

        let book = QuestionBook::new(vec![
            demo_question(b'1', "How many sides has a square?", ["3", "4", "5", "6"], [
                (-1, -1),
                (1, -1),
                (-1, 1),
                (1, 1),
            ]),
            demo_question(b'2', "Which is a prime?", ["4", "6", "7", "9"], [
                (-2, 0),
                (-1, 1),
                (1, 1),
                (2, 0),
            ]),
            demo_question(b'3', "Which way is east?", ["Up", "Right", "Down", "Left"], [
                (-1, -1),
                (-1, 0),
                (0, -1),
                (-2, 0),
            ]),
        ]);

        TileGrid::from_rows(&WALLS)
            .and_then(|walls| {
                Self::new(
                    walls,
                    Some(TileGrid::from_rows(&PROPS)?),
                    Some(TileGrid::from_rows(&QUESTIONS)?),
                    book,
                )
            })
            .expect("built-in demo maze is well formed")
    }
}

fn demo_question(
    id: QuestionId,
    text: &str,
    answers: [&str; 4],
    answer_offsets: [(i32, i32); 4],
) -> Question {
    Question {
        id,
        text: text.to_string(),
        answers: answers.map(str::to_string),
        answer_offsets,
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::questions::AnswerSlot;

    #[test]
    fn demo_layers_line_up() {
        let m = Maze::demo();
        assert_eq!((m.width(), m.height(), m.width_shift()), (8, 8, 3));
        assert!(m.is_wall(m.to_index(0, 0).unwrap()));
        assert!(m.is_wall(m.to_index(5, 3).unwrap()));
        assert!(!m.is_wall(m.to_index(2, 3).unwrap()));
        assert!(m.is_prop(m.to_index(4, 3).unwrap()));
        assert_eq!(m.prop_code(m.to_index(5, 2).unwrap()), b'3');
        assert_eq!(m.book().len(), 3);
    }

    #[test]
    fn demo_answers_sit_on_open_tiles() {
        let m = Maze::demo();
        for id in [b'1', b'2', b'3'] {
            let answers: Vec<_> = (0..m.walls().len())
                .filter(|&i| {
                    matches!(m.question_type_at(i, Some(id)), Some(QuestionTag::Answer(_)))
                })
                .collect();
            assert_eq!(answers.len(), 4, "question {}", id as char);
            assert!(answers.iter().all(|&i| !m.is_wall(i)));
        }
        let d = m.to_index(3, 3).unwrap();
        assert_eq!(
            m.question_type_at(d, Some(b'1')),
            Some(QuestionTag::Answer(AnswerSlot::D))
        );
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let walls = TileGrid::empty(8, 8).unwrap();
        let props = TileGrid::empty(16, 8).unwrap();
        let err = Maze::new(walls, Some(props), None, QuestionBook::default()).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch { layer: "prop", .. }));
    }

    #[test]
    fn open_points() {
        let m = Maze::demo();
        assert!(m.is_open(Vec2::new(96.0, 96.0)));
        assert!(!m.is_open(Vec2::new(10.0, 10.0)));
        assert!(!m.is_open(Vec2::new(-5.0, 96.0)));
        assert!(!m.is_open(Vec2::new(96.0, 600.0)));
    }
}
