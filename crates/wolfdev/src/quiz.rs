//! Quiz questions from a language text resource.
//!
//! Quizzes are blocks of lines separated by blank lines. The first line of a
//! block is the question and each following line an answer; the correct
//! answer is marked with a leading `*`.

use itertools::Itertools as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    question: String,
    answers: Vec<String>,
    correct: usize,
}

impl Quiz {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Index into [`Quiz::answers`] of the correct answer.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    fn from_block(lines: &[&str]) -> Option<Self> {
        let (question, answers) = lines.split_first()?;
        let mut correct = None;
        let mut parsed = Vec::with_capacity(answers.len());
        for (i, answer) in answers.iter().enumerate() {
            match answer.strip_prefix('*') {
                Some(_) if correct.is_some() => return None,
                Some(text) => {
                    correct = Some(i);
                    parsed.push(text.trim().to_string());
                }
                None => parsed.push(answer.to_string()),
            }
        }
        Some(Quiz {
            question: question.to_string(),
            answers: parsed,
            correct: correct?,
        })
    }
}

/// Parses every well-formed quiz in `text`. Blocks without exactly one
/// marked answer are skipped.
#[must_use]
pub fn parse_quizzes(text: &str) -> Vec<Quiz> {
    let mut quizzes = Vec::new();
    let blocks = text.lines().map(str::trim).chunk_by(|line| line.is_empty());
    for (blank, block) in &blocks {
        if blank {
            continue;
        }
        let lines: Vec<&str> = block.collect();
        match Quiz::from_block(&lines) {
            Some(quiz) => quizzes.push(quiz),
            None => log::warn!("Skipping malformed quiz starting {:?}", lines[0]),
        }
    }
    quizzes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blocks() {
        let text = "How many animals of each kind?\n\
                    One\n\
                    *Two\n\
                    Seven\n\
                    \n\
                    \r\n\
                    Who built the ark?\n\
                    *Noah\n\
                    Moses\n";
        let quizzes = parse_quizzes(text);
        assert_eq!(quizzes.len(), 2);
        assert_eq!(quizzes[0].question(), "How many animals of each kind?");
        assert_eq!(quizzes[0].answers(), ["One", "Two", "Seven"]);
        assert_eq!(quizzes[0].correct(), 1);
        assert_eq!(quizzes[1].correct(), 0);
    }

    #[test]
    fn skips_blocks_without_one_answer() {
        let text = "No answer marked\nA\nB\n\nTwo marked\n*A\n*B\n\nQuestion only\n\nGood\n*Yes\n";
        let quizzes = parse_quizzes(text);
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].question(), "Good");
    }

    #[test]
    fn empty_text_has_no_quizzes() {
        assert!(parse_quizzes("").is_empty());
        assert!(parse_quizzes("\n\n  \n").is_empty());
    }
}
