//! `&name body&` macros. They run before any other resolution step and their
//! output replaces their span in the text.

mod kinds;
mod state;

pub use state::{ProjectRecord, TriggerState};

use crate::error::{proceed, Outcome, RResult, RollError};
use crate::roll::Roller;
use crate::session::Session;
use kinds::{Trigger, TriggerKind};

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Pending(TriggerKind),
}

/// Cuts `text` into plain text and parsed triggers.
fn scan(text: &str) -> Result<Vec<Segment>, RollError> {
    let amps: Vec<usize> = text.match_indices('&').map(|(i, _)| i).collect();
    if amps.len() % 2 == 1 {
        return Err(RollError::UnmatchedDelimiter {
            delimiter: '&',
            position: amps[amps.len() - 1],
        });
    }

    let mut segments = Vec::new();
    let mut last = 0;
    for pair in amps.chunks(2) {
        let (open, close) = (pair[0], pair[1]);
        segments.push(Segment::Text(text[last..open].to_string()));
        segments.push(Segment::Pending(TriggerKind::parse(&text[open + 1..close])?));
        last = close + 1;
    }
    segments.push(Segment::Text(text[last..].to_string()));
    Ok(segments)
}

/// The text around the trigger that is firing.
pub(crate) struct Surroundings {
    segments: Vec<Segment>,
    current: usize,
}

impl Surroundings {
    fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            current: 0,
        }
    }

    /// Takes the next trigger to fire, leftmost first.
    fn next_pending(&mut self) -> Option<TriggerKind> {
        let index = self
            .segments
            .iter()
            .position(|s| matches!(s, Segment::Pending(_)))?;
        self.current = index;
        match std::mem::replace(&mut self.segments[index], Segment::Text(String::new())) {
            Segment::Pending(kind) => Some(kind),
            Segment::Text(_) => None,
        }
    }

    fn finish_current(&mut self, output: String) {
        self.segments[self.current] = Segment::Text(output);
    }

    /// Removes the last word of the text, searching from the end and skipping
    /// the firing trigger and those still to fire. A word ending in `)` reaches
    /// back to its matching `(`.
    pub fn take_trailing_word(&mut self) -> Option<String> {
        for index in (0..self.segments.len()).rev() {
            if index == self.current {
                continue;
            }
            let text = match &mut self.segments[index] {
                Segment::Text(text) => text,
                Segment::Pending(_) => continue,
            };
            let trimmed = text.trim_end().len();
            if trimmed == 0 {
                continue;
            }

            let mut depth = 0usize;
            let mut start = 0;
            for (i, c) in text[..trimmed].char_indices().rev() {
                match c {
                    ')' => depth += 1,
                    '(' => depth = depth.saturating_sub(1),
                    c if c.is_whitespace() && depth == 0 => {
                        start = i + c.len_utf8();
                        break;
                    }
                    _ => {}
                }
            }
            let word = text[start..trimmed].to_string();
            text.truncate(start);
            return Some(word);
        }
        None
    }

    fn into_text(self) -> String {
        self.segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => text,
                Segment::Pending(_) => String::new(),
            })
            .collect()
    }
}

/// Text after every trigger has fired.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Preprocessed {
    pub text: String,
    /// Whether any trigger ran.
    pub changed: bool,
}

impl<R: Roller> Session<R> {
    /// Fires the triggers in `text` left to right.
    pub(crate) fn preprocess(&mut self, text: &str) -> RResult<Preprocessed> {
        if !text.contains('&') {
            return Ok(Outcome::Done(Preprocessed {
                text: text.to_string(),
                changed: false,
            }));
        }

        let mut scope = Surroundings::new(scan(text)?);
        while let Some(kind) = scope.next_pending() {
            log::debug!("firing {:?}", kind);
            let output = proceed!(kind.fire(self, &mut scope));
            scope.finish_current(output);
        }
        Ok(Outcome::Done(Preprocessed {
            text: scope.into_text(),
            changed: true,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::init_logger;
    use crate::common::Int;
    use crate::config::{SessionConfig, ADMINISTRATOR};
    use crate::roll::{ScriptedRoller, StepRoller};

    fn session() -> Session<StepRoller> {
        init_logger();
        Session::with_roller(SessionConfig::default(), StepRoller::new(1, 1))
    }

    fn check(session: &mut Session<StepRoller>, text: &str, expected: Option<Int>) {
        let interp = session.evaluate(text).unwrap().done().unwrap();
        assert_eq!(interp.result(), expected, "{}", text);
    }

    #[test]
    fn test_scan() {
        assert_eq!(
            scan("1 & 2"),
            Err(RollError::UnmatchedDelimiter {
                delimiter: '&',
                position: 2
            })
        );
        let segments = scan("a &limitbreak& b").unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Text("a ".to_string()));
        assert_eq!(segments[2], Segment::Text(" b".to_string()));
    }

    #[test]
    fn test_trailing_words() {
        let mut scope = Surroundings::new(vec![
            Segment::Text("n 3 (2 + (4))  ".to_string()),
            Segment::Pending(kinds::Resonances.into()),
            Segment::Text(" ".to_string()),
        ]);
        scope.current = 2;
        assert_eq!(scope.take_trailing_word(), Some("(2 + (4))".to_string()));
        assert_eq!(scope.take_trailing_word(), Some("3".to_string()));
        assert_eq!(scope.take_trailing_word(), Some("n".to_string()));
        assert_eq!(scope.take_trailing_word(), None);
    }

    #[test]
    fn test_loopsum() {
        let mut s = session();
        check(&mut s, "&loopsum 1 8&", Some(8));
        // each pass through the loop is in the history
        assert_eq!(s.history().len(), 9);
        check(&mut s, "&loop 1 3&7", Some(7));
    }

    #[test]
    fn test_if_then_else() {
        let mut s = session();
        check(&mut s, "&if 3 then $ + 1 else 0 done&", Some(4));
        check(&mut s, "&if 2 - 2 then 5 else 9 done&", Some(9));
    }

    #[test]
    fn test_param() {
        let mut s = session();
        check(&mut s, "&param n s& n 3 (2 + 4)", Some(3));
        assert_eq!(s.defines().get("n"), Some("3"));
        assert_eq!(s.defines().get("s"), Some("6"));
    }

    #[test]
    fn test_param_through_define() {
        let mut s = Session::with_roller(SessionConfig::default(), ScriptedRoller::new([2, 5, 6]));
        s.defines_mut().insert("attack", "&param pool& pool d10g");
        let interp = s.evaluate("attack 3").unwrap().done().unwrap();
        assert_eq!(interp.result(), Some(13));
        assert_eq!(s.defines().get("pool"), Some("3"));
    }

    #[test]
    fn test_values() {
        let mut s = session();
        check(&mut s, "&values str: 3; dex: 4& str + dex", Some(7));
        check(&mut s, "&values sel: 1,2@5d10; n: 3& n", Some(3));
        assert_eq!(s.defines().get("sel"), Some("1,2@5d10"));
    }

    #[test]
    fn test_resonances_short_circuit() {
        let mut s = session();
        let out = s.roll("2 + &resonances& + 3").unwrap();
        assert_eq!(out, Outcome::ShortCircuit("no selector rolls".to_string()));
    }

    #[test]
    fn test_resonances_count_single_faces() {
        let mut s = Session::with_roller(SessionConfig::default(), ScriptedRoller::new([1, 2, 3, 3]));
        s.roll("1@4").unwrap();
        let out = s.roll("&resonances&").unwrap();
        assert_eq!(out.message(), Some("1@4: 1\u{d7}0, 2\u{d7}0, 3\u{d7}1"));
    }

    #[test]
    fn test_unknown_trigger() {
        let mut s = session();
        assert_eq!(
            s.evaluate("&dance&"),
            Err(RollError::UnknownTrigger("dance".to_string()))
        );
    }

    #[test]
    fn test_limitbreak() {
        let mut s = session();
        check(&mut s, "&limitbreak&4", Some(4));
        assert!(!s.triggers().limitbreak());
        assert!(s.triggers().rights_violation());

        let config = SessionConfig::new().with_permission(ADMINISTRATOR);
        let mut s = Session::with_roller(config, StepRoller::new(1, 1));
        s.evaluate("&limitbreak&4").unwrap();
        assert!(s.triggers().limitbreak());
        assert!(!s.triggers().rights_violation());
    }

    #[test]
    fn test_loop_cap() {
        let mut s = session();
        check(&mut s, "&loopsum 1 500&", Some(100));
    }

    #[test]
    fn test_project() {
        let mut s = session();
        check(&mut s, "&project 3 10&", Some(4));
        let record = s.triggers().project().unwrap();
        assert_eq!((record.iterations, record.total, record.goal), (4, 12, 10));
        assert_eq!(record.log.len(), 4);

        check(&mut s, "&max 2&&project 3 10&", Some(2));
        assert_eq!(s.triggers().max(), Some(2));
    }

    #[test]
    fn test_toggles() {
        let mut s = session();
        s.evaluate("&verbose&&ignore& 1").unwrap();
        assert!(s.triggers().verbose());
        assert!(s.triggers().ignore());
        s.evaluate("&ignore off& 1").unwrap();
        assert!(!s.triggers().ignore());
        check(&mut s, "&shift -2& 5", Some(5));
        assert_eq!(s.triggers().shift(), Some(-2));
    }
}
