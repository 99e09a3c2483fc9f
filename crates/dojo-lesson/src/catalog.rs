//! Catalog — the built-in lessons and challenges.

use std::time::Duration;

use dojo_editor::{ObjectKind, Position, SearchDirection, VisualKind};

use crate::challenge::{Challenge, Task};
use crate::goal::{Goal, Requirement};
use crate::lesson::Lesson;

/// Lessons in teaching order.
#[must_use]
pub fn lessons() -> Vec<Lesson> {
    vec![
        Lesson::new(
            "How to Exit (Ex Commands)",
            "Type :q to quit, or :wq to write and quit. Press Enter after the command.",
            &[
                "Welcome to vimdojo!",
                "Most searched question: how to exit Vim?",
                "Try typing :q and press Enter (or :wq).",
            ],
            Goal::ExCommand {
                accepted: vec!["q".into(), "wq".into()],
            },
        ),
        Lesson::new(
            "Basic Movement",
            "Use h, j, k, l to move the cursor. Reach the '$' at the end.",
            &[
                "Move with h(left), j(down), k(up), l(right).",
                "Your cursor starts here.",
                "",
                "The goal is to navigate to the dollar sign.",
                "Practice moving around the text.",
                "Once you are comfortable, move to the '$'.",
            ],
            Goal::CursorAt {
                target: Position::new(5, 39),
            },
        )
        .starting_at(1, 5),
        Lesson::new(
            "Delete Basics",
            "Use dd to delete the middle line, then dw to remove the word 'mistake'.",
            &["Keep this line.", "Delete this entire line.", "Fix this mistake here."],
            Goal::content(&["Keep this line.", "Fix this here."]),
        ),
        Lesson::new(
            "Change Word (cw)",
            "Use cw to change the word 'bad' into 'good'. Press Esc when done.",
            &["This is a bad example."],
            Goal::LineEquals {
                row: 0,
                text: "This is a good example.".into(),
            },
        )
        .starting_at(0, 10),
        Lesson::new(
            "Undo / Redo",
            "Delete the middle line with dd, undo it with u, then redo with Ctrl-r.",
            &["Top line.", "Remove me.", "Bottom line."],
            Goal::All(vec![
                Goal::content(&["Top line.", "Bottom line."]),
                Goal::Used(Requirement::RedoAfterUndo),
            ]),
        )
        .starting_at(1, 0),
        Lesson::new(
            "Search Navigation (n/N)",
            "Search for 'foo' with /foo then press n twice to reach the third occurrence.",
            &["foo bar baz", "qux foo quux", "corge grault foo"],
            Goal::SearchLanding {
                target: Position::new(2, 13),
                query: "foo".into(),
                direction: SearchDirection::Forward,
                min_navigations: 2,
            },
        ),
        Lesson::new(
            "Visual Mode: Block Selection",
            "Press Ctrl-v, select the first column of text, then press d.",
            &["A line with text", "B line with text", "C line with text"],
            Goal::All(vec![
                Goal::content(&[" line with text", " line with text", " line with text"]),
                Goal::Used(Requirement::VisualMode(VisualKind::Block)),
            ]),
        ),
        Lesson::new(
            "Text Objects: Parentheses and Quotes",
            "Use di( to empty the parentheses, then ci\" to change the quoted text.",
            &["function(old parameters)", "console.log(\"old text\");"],
            Goal::All(vec![
                Goal::LineContains {
                    row: 0,
                    needle: "function()".into(),
                },
                Goal::LineContains {
                    row: 1,
                    needle: "\"new text\"".into(),
                },
                Goal::Used(Requirement::DistinctTextObjects(2)),
            ]),
        )
        .starting_at(0, 8),
        Lesson::new(
            "Text Objects: Paragraphs and Sentences",
            "Use dip to delete the first paragraph, then dis to delete a sentence.",
            &[
                "First paragraph.",
                "Second paragraph.",
                "",
                "This is a sentence. This is another sentence.",
                "Final paragraph.",
            ],
            Goal::All(vec![
                Goal::Used(Requirement::TextObject(ObjectKind::Paragraph)),
                Goal::Used(Requirement::TextObject(ObjectKind::Sentence)),
            ]),
        )
        .starting_at(1, 0),
        Lesson::new(
            "Macros: Recording and Playback",
            "Record a macro with qa that deletes a word, then replay it with @a.",
            &["delete this word and this word"],
            Goal::All(vec![
                Goal::Used(Requirement::MacroRecorded),
                Goal::Used(Requirement::MacroPlayed),
            ]),
        )
        .starting_at(0, 7),
        Lesson::new(
            "Search & Replace",
            "Type :s/old/new/g and press Enter.",
            &["old text with old words", "more old content here"],
            Goal::All(vec![
                Goal::content(&["new text with new words", "more new content here"]),
                Goal::Used(Requirement::Substitution),
            ]),
        ),
        Lesson::new(
            "Marks and Jumps",
            "Set a mark with ma, move to the last line, then jump back with 'a.",
            &["Set mark here", "Move to this line", "Jump back to mark"],
            Goal::All(vec![
                Goal::Used(Requirement::MarkSet),
                Goal::Used(Requirement::MarkJump),
            ]),
        ),
        Lesson::new(
            "Advanced Motions",
            "Use % to jump between matching parentheses, then f to find the next 'x'.",
            &["(nested (parentheses) here)", "find the x character"],
            Goal::Used(Requirement::AdvancedMotions(2)),
        )
        .starting_at(0, 7),
    ]
}

/// Timed challenges.
#[must_use]
pub fn challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            name: "Speed Navigation".into(),
            description: "Navigate to the target using the fastest route!".into(),
            time_limit: Duration::from_secs(90),
            initial_content: vec![
                "one two three target here at end".into(),
                "second line for practice".into(),
            ],
            tasks: vec![
                Task::new(
                    "Move to the word 'target' using 3w",
                    "Use 3w to jump 3 words forward",
                    Goal::CursorAt {
                        target: Position::new(0, 14),
                    },
                ),
                Task::new(
                    "Jump to the end of the line with $",
                    "Use $ to jump to end of line",
                    Goal::CursorAt {
                        target: Position::new(0, 31),
                    },
                ),
                Task::new(
                    "Go to the first line with gg",
                    "Use gg to jump to first line",
                    Goal::CursorAt {
                        target: Position::new(0, 0),
                    },
                ),
            ],
        },
        Challenge {
            name: "Quick Deletion".into(),
            description: "Delete and modify text rapidly!".into(),
            time_limit: Duration::from_secs(120),
            initial_content: vec![
                "delete this remove line".into(),
                "delete this line too".into(),
                "This is BAD text".into(),
            ],
            tasks: vec![
                Task::new(
                    "Delete the word 'remove' from the first line using dw",
                    "Position cursor on 'r' of 'remove', then use dw",
                    Goal::LineEquals {
                        row: 0,
                        text: "delete this line".into(),
                    },
                ),
                Task::new(
                    "Delete the second line completely using dd",
                    "Use j to go down to the second line, then dd",
                    Goal::All(vec![
                        Goal::LineCount { count: 2 },
                        Goal::LineEquals {
                            row: 1,
                            text: "This is BAD text".into(),
                        },
                    ]),
                ),
                Task::new(
                    "Change 'BAD' to 'GOOD' on the second line using cw",
                    "Position cursor on 'B' of 'BAD', use cw then type GOOD",
                    Goal::All(vec![
                        Goal::LineContains {
                            row: 1,
                            needle: "GOOD".into(),
                        },
                        Goal::LineLacks {
                            row: 1,
                            needle: "BAD".into(),
                        },
                    ]),
                ),
            ],
        },
        Challenge {
            name: "Advanced Moves".into(),
            description: "Master complex command combinations!".into(),
            time_limit: Duration::from_secs(150),
            initial_content: vec![
                "first line to copy".into(),
                "replace this x".into(),
                String::new(),
            ],
            tasks: vec![
                Task::new(
                    "Yank the first line with yy",
                    "Use yy to yank the current line",
                    Goal::Register {
                        text: "first line to copy".into(),
                    },
                ),
                Task::new(
                    "Go to the third line and paste with p",
                    "Use j to go down 2 lines, then p to paste",
                    Goal::All(vec![
                        Goal::LineCount { count: 4 },
                        Goal::LineEquals {
                            row: 3,
                            text: "first line to copy".into(),
                        },
                    ]),
                ),
                Task::new(
                    "Replace 'x' with '!' on the second line using r",
                    "Position cursor on 'x', use r then !",
                    Goal::All(vec![
                        Goal::LineContains {
                            row: 1,
                            needle: "!".into(),
                        },
                        Goal::LineLacks {
                            row: 1,
                            needle: "x".into(),
                        },
                    ]),
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::challenge::{ChallengeRun, ChallengeState};
    use crate::lesson::LessonRun;
    use dojo_editor::Options;
    use dojo_input::parse_keys;
    use pretty_assertions::assert_eq;

    fn solve(name: &str, keys: &str) -> bool {
        let lesson = lessons()
            .into_iter()
            .find(|l| l.name == name)
            .unwrap();
        let mut run = LessonRun::new(lesson);
        run.feed_notation(keys).unwrap();
        run.is_complete()
    }

    #[test]
    fn starting_cursors_are_inside_the_text() {
        for lesson in lessons() {
            let run = LessonRun::new(lesson.clone());
            assert_eq!(run.session().cursor(), lesson.start, "{}", lesson.name);
            assert!(!run.is_complete(), "{} starts complete", lesson.name);
        }
    }

    #[test]
    fn lessons_are_solvable() {
        assert!(solve("How to Exit (Ex Commands)", ":wq<CR>"));
        assert!(solve("Basic Movement", "4j$hh"));
        assert!(solve("Delete Basics", "jddwwdw"));
        assert!(solve("Change Word (cw)", "cwgood<Esc>"));
        assert!(solve("Undo / Redo", "ddu<C-r>"));
        assert!(!solve("Undo / Redo", "dd"));
        assert!(solve("Search Navigation (n/N)", "/foo<CR>nn"));
        assert!(solve("Visual Mode: Block Selection", "<C-v>jjd"));
        assert!(solve(
            "Text Objects: Parentheses and Quotes",
            "di(jf\"ci\"new text<Esc>"
        ));
        assert!(solve("Text Objects: Paragraphs and Sentences", "dipjdis"));
        assert!(solve("Macros: Recording and Playback", "qadwq@a"));
        assert!(solve("Search & Replace", ":s/old/new/g<CR>"));
        assert!(solve("Marks and Jumps", "maG'a"));
        assert!(solve("Advanced Motions", "l%j0fx"));
    }

    #[test]
    fn challenges_are_solvable() {
        let scripts = ["3w$gg", "wwdwjddwwcwGOOD<Esc>", "yyjjpkk$r!"];
        let t0 = Instant::now();
        for (challenge, script) in challenges().into_iter().zip(scripts) {
            let name = challenge.name.clone();
            let mut run = ChallengeRun::start(challenge, Options::default(), t0);
            for key in parse_keys(script).unwrap() {
                run.feed(key, t0);
            }
            assert_eq!(run.state(), ChallengeState::Completed, "{name}");
        }
    }
}
