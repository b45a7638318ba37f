use serde::Serialize;

/// One quiz question. The correct answer index never leaves the server;
/// submissions are graded here against it.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub question: &'static str,
    pub options: [&'static str; 4],
    #[serde(skip)]
    pub correct_answer: usize,
}

pub const QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        question: "বাংলাদেশের জাতীয় ফলের নাম কি?",
        options: ["আম", "কাঁঠাল", "লিচু", "কলা"],
        correct_answer: 1,
    },
    QuizQuestion {
        question: "৫ + ৫ × ২ = কত?",
        options: ["২০", "১৫", "১০", "২৫"],
        correct_answer: 1,
    },
    QuizQuestion {
        question: "বিশ্বের বৃহত্তম ম্যানগ্রোভ বন কোনটি?",
        options: ["সুন্দরবন", "আমাজন", "আফ্রিকান জঙ্গল", "ভাওয়াল বন"],
        correct_answer: 0,
    },
];

/// Number of correct picks. Missing or out-of-range answers score zero.
pub fn grade(answers: &[usize]) -> usize {
    QUESTIONS
        .iter()
        .zip(answers.iter())
        .filter(|(q, a)| q.correct_answer == **a)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grading_counts_correct_answers() {
        assert_eq!(grade(&[1, 1, 0]), 3);
        assert_eq!(grade(&[0, 1, 0]), 2);
        assert_eq!(grade(&[3, 2, 9]), 0);
    }

    #[test]
    fn short_submissions_only_score_answered_questions() {
        assert_eq!(grade(&[1]), 1);
        assert_eq!(grade(&[]), 0);
    }

    #[test]
    fn extra_answers_are_ignored() {
        assert_eq!(grade(&[1, 1, 0, 2, 2]), 3);
    }

    #[test]
    fn questions_never_serialize_their_answer() {
        let json = serde_json::to_value(QUESTIONS).unwrap();
        assert!(json[0].get("correct_answer").is_none());
        assert!(json[0].get("question").is_some());
    }
}
