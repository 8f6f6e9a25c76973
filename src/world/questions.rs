//! Quiz markers: question-mark tiles and the A–D answer tiles that appear
//! around the question the player is currently standing on.

use std::collections::HashMap;

use crate::world::grid::{EMPTY, TileCode, TileGrid, TileIndex};

/// A question is named by its code in the question-position grid.
pub type QuestionId = TileCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnswerSlot {
    A,
    B,
    C,
    D,
}

impl AnswerSlot {
    pub const ALL: [AnswerSlot; 4] = [AnswerSlot::A, AnswerSlot::B, AnswerSlot::C, AnswerSlot::D];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

/// What a question-layer tile shows: `'?'` or one of `'A'..='D'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestionTag {
    Mark,
    Answer(AnswerSlot),
}

impl QuestionTag {
    pub fn as_char(self) -> char {
        match self {
            QuestionTag::Mark => '?',
            QuestionTag::Answer(slot) => slot.as_char(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub answers: [String; 4],
    /// `(dx, dy)` in tiles from the question mark to each answer tile.
    pub answer_offsets: [(i32, i32); 4],
}

impl Question {
    /// Question and answers laid out for the text box.
    pub fn prompt(&self) -> String {
        let mut out = format!("{}\n\n", self.text);
        for slot in AnswerSlot::ALL {
            out.push_str(&format!("{}. {}\n", slot.as_char(), self.answers[slot.index()]));
        }
        out.push_str("\n(Follow the path in the maze associated with the correct answer.)");
        out
    }
}

/// All questions of one maze.
#[derive(Clone, Debug, Default)]
pub struct QuestionBook {
    questions: Vec<Question>,
}

impl QuestionBook {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Question-position layer plus a reverse index id → tile.
#[derive(Clone, Debug)]
pub struct QuestionMarkers {
    grid: TileGrid,
    positions: HashMap<QuestionId, TileIndex>,
}

impl QuestionMarkers {
    pub fn new(grid: TileGrid) -> Self {
        let positions = grid.occupied().map(|(idx, id)| (id, idx)).collect();
        Self { grid, positions }
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn position_of(&self, id: QuestionId) -> Option<TileIndex> {
        self.positions.get(&id).copied()
    }

    /// Question id whose mark sits on `idx`.
    pub fn question_at(&self, idx: TileIndex) -> Option<QuestionId> {
        let code = self.grid.code(idx);
        (code != EMPTY).then_some(code)
    }

    /// Tag of `idx` given the active question.  Marks are always reported;
    /// answer tiles only exist while their question is active.
    pub fn tag_at(
        &self,
        idx: TileIndex,
        book: &QuestionBook,
        active: Option<QuestionId>,
    ) -> Option<QuestionTag> {
        if self.grid.is_occupied(idx) {
            return Some(QuestionTag::Mark);
        }
        let id = active?;
        let mark = self.position_of(id)?;
        let question = book.get(id)?;
        let (row, col) = self.grid.row_col(mark);

        AnswerSlot::ALL.into_iter().find_map(|slot| {
            let (dx, dy) = question.answer_offsets[slot.index()];
            let answer = self.grid.index_of(col as i32 + dx, row as i32 + dy)?;
            (answer == idx).then_some(QuestionTag::Answer(slot))
        })
    }

    /// Like [`tag_at`](Self::tag_at) but hides the active question's own mark.
    pub fn visible_tag_at(
        &self,
        idx: TileIndex,
        book: &QuestionBook,
        active: Option<QuestionId>,
    ) -> Option<QuestionTag> {
        match self.tag_at(idx, book, active)? {
            QuestionTag::Mark if active.is_some() && self.question_at(idx) == active => None,
            tag => Some(tag),
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> (QuestionMarkers, QuestionBook) {
        let grid = TileGrid::from_rows(&["0000", "0100", "0000", "0002"]).unwrap();
        let book = QuestionBook::new(vec![Question {
            id: b'1',
            text: "2 + 2 ?".into(),
            answers: ["3".into(), "4".into(), "5".into(), "22".into()],
            answer_offsets: [(-1, -1), (1, -1), (-1, 1), (9, 9)],
        }]);
        (QuestionMarkers::new(grid), book)
    }

    #[test]
    fn marks_are_always_visible_answers_only_when_active() {
        let (m, book) = markers();
        let g = m.grid();
        let mark = g.index_of(1, 1).unwrap();
        let a = g.index_of(0, 0).unwrap();

        assert_eq!(m.tag_at(mark, &book, None), Some(QuestionTag::Mark));
        assert_eq!(m.tag_at(a, &book, None), None);
        assert_eq!(
            m.tag_at(a, &book, Some(b'1')),
            Some(QuestionTag::Answer(AnswerSlot::A))
        );
        assert_eq!(
            m.tag_at(g.index_of(2, 0).unwrap(), &book, Some(b'1')),
            Some(QuestionTag::Answer(AnswerSlot::B))
        );
        assert_eq!(
            m.tag_at(g.index_of(0, 2).unwrap(), &book, Some(b'1')),
            Some(QuestionTag::Answer(AnswerSlot::C))
        );
    }

    #[test]
    fn off_grid_answers_are_ignored() {
        let (m, book) = markers();
        let hits = (0..m.grid().len())
            .filter(|&i| matches!(m.tag_at(i, &book, Some(b'1')), Some(QuestionTag::Answer(_))))
            .count();
        assert_eq!(hits, 3);
    }

    #[test]
    fn active_mark_is_hidden_from_view() {
        let (m, book) = markers();
        let mark = m.position_of(b'1').unwrap();
        let other = m.position_of(b'2').unwrap();
        assert_eq!(m.visible_tag_at(mark, &book, Some(b'1')), None);
        assert_eq!(
            m.visible_tag_at(other, &book, Some(b'1')),
            Some(QuestionTag::Mark)
        );
        assert_eq!(m.visible_tag_at(mark, &book, None), Some(QuestionTag::Mark));
    }

    #[test]
    fn tag_chars() {
        assert_eq!(QuestionTag::Mark.as_char(), '?');
        assert_eq!(QuestionTag::Answer(AnswerSlot::D).as_char(), 'D');
    }

    #[test]
    fn prompt_lists_every_answer() {
        let (_, book) = markers();
        let text = book.get(b'1').unwrap().prompt();
        assert!(text.starts_with("2 + 2 ?\n"));
        assert!(text.contains("B. 4\n"));
        assert!(text.contains("D. 22\n"));
    }
}
