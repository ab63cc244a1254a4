//! Scripted health assistant.
//!
//! Not a language model: each message is matched against a fixed list of
//! keyword categories and answered with a canned reply. Categories are
//! checked in priority order and the first match wins.

use regex::RegexSet;
use std::sync::OnceLock;

use super::{PredictionResult, RiskLevel};

/// Reply category, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatTopic {
    Results,
    Improve,
    Diet,
    Exercise,
    Risk,
    Symptoms,
    Medication,
    Greeting,
    Thanks,
    Fallback,
}

/// Keyword patterns, indexed like `PRIORITY`. Keywords are word-prefix anchored
/// so `eat` matches "eating" but `hi` never matches "this".
const TOPIC_PATTERNS: [(ChatTopic, &str); 9] = [
    (
        ChatTopic::Results,
        r"(?i)\b(result|report|score|percentage|outcome|assessment)",
    ),
    (
        ChatTopic::Improve,
        r"(?i)\b(improv|better|lower|reduc|prevent|healthier)",
    ),
    (
        ChatTopic::Diet,
        r"(?i)\b(eat|diet|food|meal|nutrition|salt|sugar)",
    ),
    (
        ChatTopic::Exercise,
        r"(?i)\b(exercis|workout|walk|run|activit|fitness|cardio|sport|gym)",
    ),
    (ChatTopic::Risk, r"(?i)\b(risk|chance|likel|danger)"),
    (
        ChatTopic::Symptoms,
        r"(?i)\b(symptom|chest pain|sign|warning|breath|dizz|palpitat)",
    ),
    (
        ChatTopic::Medication,
        r"(?i)\b(medic|drug|pill|statin|aspirin|prescription|tablet)",
    ),
    (
        ChatTopic::Greeting,
        r"(?i)\b(hello|hi|hey|greetings|good (morning|afternoon|evening))\b",
    ),
    (ChatTopic::Thanks, r"(?i)\b(thank|thx|appreciat|cheers)"),
];

/// A canned reply block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatReply {
    pub topic: ChatTopic,
    pub title: &'static str,
    pub lines: &'static [&'static str],
}

impl ChatTopic {
    /// The canned reply for this topic.
    #[must_use]
    pub fn reply(self) -> ChatReply {
        let (title, lines): (&'static str, &'static [&'static str]) = match self {
            Self::Results => (
                "Understanding your results",
                &[
                    "Your risk percentage is an estimate from 0 to 100%.",
                    "Below 34% is LOW risk, 34-66% is MODERATE, 67% and above is HIGH.",
                    "Open the History tab to compare with earlier assessments.",
                    "A high score is a prompt to see a doctor, not a diagnosis.",
                ],
            ),
            Self::Improve => (
                "Improving your heart health",
                &[
                    "Stop smoking and avoid second-hand smoke.",
                    "Keep blood pressure below 120/80 mmHg where possible.",
                    "Aim for at least 150 minutes of moderate activity per week.",
                    "Maintain a healthy weight and manage stress.",
                    "Get regular check-ups for cholesterol and blood sugar.",
                ],
            ),
            Self::Diet => (
                "Heart-healthy eating",
                &[
                    "Eat: vegetables, fruit, whole grains, legumes, nuts, oily fish.",
                    "Prefer olive oil and other unsaturated fats.",
                    "Avoid: fried food, processed meat, sugary drinks, excess salt.",
                    "Keep sodium under 2,300 mg per day (1,500 mg if advised).",
                ],
            ),
            Self::Exercise => (
                "Staying active",
                &[
                    "Brisk walking, cycling or swimming 30 minutes, 5 days a week.",
                    "Add light strength training twice a week.",
                    "Warm up and cool down; stop if you feel chest pain or dizziness.",
                    "If your risk is HIGH, ask your doctor before starting a new program.",
                ],
            ),
            Self::Risk => (
                "About heart disease risk",
                &[
                    "Main risk factors: age, high blood pressure, high cholesterol,",
                    "smoking, diabetes, obesity, inactivity and family history.",
                    "Many of them can be changed. Run an assessment to see your estimate.",
                ],
            ),
            Self::Symptoms => (
                "Warning signs",
                &[
                    "Chest pain or pressure, especially on exertion.",
                    "Shortness of breath, palpitations, dizziness or fainting.",
                    "Pain spreading to the arm, jaw or back; cold sweats; nausea.",
                    "If symptoms are sudden or severe, call emergency services now.",
                ],
            ),
            Self::Medication => (
                "Medication",
                &[
                    "Common heart medicines include statins, beta blockers,",
                    "ACE inhibitors and low-dose aspirin.",
                    "Never start, stop or change a medicine without your doctor.",
                ],
            ),
            Self::Greeting => (
                "Hello!",
                &[
                    "I'm the heart health assistant.",
                    "Ask me about your results, diet, exercise, risk factors,",
                    "symptoms or medication.",
                ],
            ),
            Self::Thanks => (
                "You're welcome!",
                &["Take care of your heart. Ask me anything else any time."],
            ),
            Self::Fallback => (
                "I'm not sure I understood",
                &[
                    "Try asking about: results, improving health, diet, exercise,",
                    "risk factors, symptoms or medication.",
                    "For medical concerns, please consult a healthcare professional.",
                ],
            ),
        };

        ChatReply {
            topic: self,
            title,
            lines,
        }
    }
}

fn topic_set() -> &'static RegexSet {
    static TOPICS: OnceLock<RegexSet> = OnceLock::new();
    TOPICS.get_or_init(|| {
        // Patterns are compile-time constants covered by tests.
        RegexSet::new(TOPIC_PATTERNS.iter().map(|(_, p)| *p)).expect("Valid topic patterns")
    })
}

/// Classify a user message into a topic.
#[must_use]
pub fn classify(message: &str) -> ChatTopic {
    // SetMatches iterates in pattern index order, which is priority order.
    topic_set()
        .matches(message)
        .iter()
        .next()
        .map_or(ChatTopic::Fallback, |idx| TOPIC_PATTERNS[idx].0)
}

/// Canned reply for a user message.
#[must_use]
pub fn respond(message: &str) -> ChatReply {
    classify(message).reply()
}

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAuthor {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub author: ChatAuthor,
    pub topic: Option<ChatTopic>,
    pub title: Option<String>,
    pub lines: Vec<String>,
}

impl ChatMessage {
    fn from_user(text: &str) -> Self {
        Self {
            author: ChatAuthor::User,
            topic: None,
            title: None,
            lines: vec![text.to_string()],
        }
    }

    fn from_reply(reply: ChatReply) -> Self {
        Self {
            author: ChatAuthor::Assistant,
            topic: Some(reply.topic),
            title: Some(reply.title.to_string()),
            lines: reply.lines.iter().map(|l| (*l).to_string()).collect(),
        }
    }
}

fn latest_result_line(percentage: f64) -> String {
    let level = RiskLevel::from_percentage(percentage);
    format!("Your latest assessment scored {percentage:.1}%, which is {level} risk.")
}

/// In-memory chat transcript for the current session.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::from_reply(ChatTopic::Greeting.reply())],
        }
    }
}

impl ChatTranscript {
    /// Append a user message and the assistant's answer.
    ///
    /// Questions about results mention `latest` when there is one.
    /// Blank input is ignored and returns `None`.
    pub fn ask(&mut self, text: &str, latest: Option<&PredictionResult>) -> Option<ChatTopic> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let reply = respond(text);
        let mut answer = ChatMessage::from_reply(reply);
        if let (ChatTopic::Results, Some(result)) = (reply.topic, latest) {
            answer.lines.insert(0, latest_result_line(result.risk_percentage));
        }

        self.messages.push(ChatMessage::from_user(text));
        self.messages.push(answer);
        Some(reply.topic)
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diet_question() {
        assert_eq!(classify("What should I eat?"), ChatTopic::Diet);
    }

    #[test]
    fn test_priority_order() {
        // results beats risk
        assert_eq!(classify("What does my risk result mean?"), ChatTopic::Results);
        // improve beats diet
        assert_eq!(classify("How can I improve my diet?"), ChatTopic::Improve);
        // exercise beats greeting
        assert_eq!(classify("hi, is walking good?"), ChatTopic::Exercise);
        // medication beats thanks
        assert_eq!(classify("thanks, and what about statins"), ChatTopic::Medication);
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(classify("this"), ChatTopic::Fallback);
        assert_eq!(classify("Hi there"), ChatTopic::Greeting);
        assert_eq!(classify("I keep eating late"), ChatTopic::Diet);
        assert_eq!(classify("Thank you!"), ChatTopic::Thanks);
    }

    #[test]
    fn test_deterministic() {
        let a = classify("Any warning signs I should know?");
        let b = classify("Any warning signs I should know?");
        assert_eq!(a, b);
        assert_eq!(a, ChatTopic::Symptoms);
    }

    #[test]
    fn test_respond_fallback_reply() {
        let reply = respond("tell me about quantum physics");
        assert_eq!(reply.topic, ChatTopic::Fallback);
        assert!(!reply.lines.is_empty());
    }

    #[test]
    fn test_patterns_compile() {
        assert_eq!(topic_set().len(), TOPIC_PATTERNS.len());
    }

    #[test]
    fn test_transcript() {
        let mut transcript = ChatTranscript::default();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.ask("   ", None), None);
        assert_eq!(transcript.ask("What should I eat?", None), Some(ChatTopic::Diet));

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].author, ChatAuthor::User);
        assert_eq!(messages[2].author, ChatAuthor::Assistant);
        assert_eq!(messages[2].title.as_deref(), Some("Heart-healthy eating"));
    }

    #[test]
    fn test_results_reply_without_assessment_is_generic() {
        let mut transcript = ChatTranscript::default();
        transcript.ask("Explain my results", None);

        let answer = &transcript.messages()[2];
        assert_eq!(answer.topic, Some(ChatTopic::Results));
        assert_eq!(answer.lines.len(), ChatTopic::Results.reply().lines.len());
        assert!(!answer.lines[0].contains("latest assessment"));
    }

    #[test]
    fn test_results_reply_mentions_latest_assessment() {
        let latest: PredictionResult =
            serde_json::from_str(r#"{"risk_percentage": 72.44}"#).expect("Should parse");
        let mut transcript = ChatTranscript::default();
        transcript.ask("Explain my results", Some(&latest));

        let answer = &transcript.messages()[2];
        assert_eq!(
            answer.lines[0],
            "Your latest assessment scored 72.4%, which is HIGH risk."
        );

        // Other topics ignore the assessment.
        transcript.ask("What should I eat?", Some(&latest));
        let diet = &transcript.messages()[4];
        assert_eq!(diet.lines.len(), ChatTopic::Diet.reply().lines.len());
    }
}
