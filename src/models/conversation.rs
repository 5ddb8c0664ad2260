use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const USER_ROLE: &str = "user";
pub const ASSISTANT_ROLE: &str = "assistant";

/// One turn of the caller's history. Fields beyond `role` and `content` are
/// carried along untouched so the echoed history matches what was sent.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: String,
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            content: Value::String(content.into()),
            extra: Map::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ASSISTANT_ROLE.to_string(),
            content: Value::String(content.into()),
            extra: Map::new(),
        }
    }

    /// Anything other than exactly `"user"` is spoken by the assistant.
    fn label(&self) -> &'static str {
        if self.role == USER_ROLE {
            "User"
        } else {
            "Assistant"
        }
    }

    fn text(&self) -> String {
        match &self.content {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

impl ChatRequest {
    /// Transcript sent to the generation endpoint, one line per turn with the
    /// new message last.
    pub fn render_prompt(&self) -> String {
        self.conversation_history
            .iter()
            .map(|turn| format!("{}: {}", turn.label(), turn.text()))
            .chain(std::iter::once(format!("User: {}", self.message)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// History as it stands after the assistant replied. `self` is left as is.
    pub fn updated_history(&self, reply: &str) -> Vec<ConversationTurn> {
        let mut history = self.conversation_history.clone();
        history.push(ConversationTurn::user(self.message.as_str()));
        history.push(ConversationTurn::assistant(reply));
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> ConversationTurn {
        ConversationTurn {
            role: role.to_string(),
            content: Value::String(content.to_string()),
            extra: Map::new(),
        }
    }

    fn request(history: Vec<ConversationTurn>, message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_history: history,
        }
    }

    #[test]
    fn empty_history_renders_single_line() {
        let prompt = request(vec![], "hello").render_prompt();
        assert_eq!(prompt, "User: hello");
    }

    #[test]
    fn renders_turns_in_order() {
        let req = request(
            vec![turn("user", "hi"), turn("assistant", "hello there")],
            "how are you?",
        );
        assert_eq!(
            req.render_prompt(),
            "User: hi\nAssistant: hello there\nUser: how are you?"
        );
    }

    #[test]
    fn any_other_role_is_assistant() {
        let req = request(
            vec![turn("system", "be nice"), turn("User", "caps"), turn("", "blank")],
            "ok",
        );
        let prompt = req.render_prompt();
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(
            lines,
            vec!["Assistant: be nice", "Assistant: caps", "Assistant: blank", "User: ok"]
        );
    }

    #[test]
    fn line_count_is_history_plus_one() {
        let history: Vec<_> = (0..7)
            .map(|i| turn(if i % 2 == 0 { "user" } else { "assistant" }, &format!("t{i}")))
            .collect();
        let req = request(history, "last");
        let prompt = req.render_prompt();
        assert_eq!(prompt.split('\n').count(), 8);
        assert_eq!(prompt.split('\n').last(), Some("User: last"));
    }

    #[test]
    fn updated_history_appends_without_touching_input() {
        let original = vec![turn("user", "hi"), turn("assistant", "hey")];
        let req = request(original.clone(), "next");

        let updated = req.updated_history("reply");

        assert_eq!(req.conversation_history, original);
        assert_eq!(updated.len(), original.len() + 2);
        assert_eq!(&updated[..2], &original[..]);
        assert_eq!(updated[2], ConversationTurn::user("next"));
        assert_eq!(updated[3], ConversationTurn::assistant("reply"));
    }

    #[test]
    fn extra_turn_fields_survive_the_round_trip() {
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "next",
            "conversationHistory": [
                {"role": "user", "content": "hi", "id": "t1", "timestamp": 1700000000}
            ]
        }))
        .unwrap();

        let updated = serde_json::to_value(req.updated_history("reply")).unwrap();
        assert_eq!(
            updated[0],
            serde_json::json!({"role": "user", "content": "hi", "id": "t1", "timestamp": 1700000000})
        );
        assert_eq!(updated[1], serde_json::json!({"role": "user", "content": "next"}));
    }

    #[test]
    fn non_string_content_is_rendered_as_json() {
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "ok",
            "conversationHistory": [{"role": "assistant", "content": {"parts": [1, 2]}}]
        }))
        .unwrap();
        assert_eq!(
            req.render_prompt(),
            "Assistant: {\"parts\":[1,2]}\nUser: ok"
        );
    }

    #[test]
    fn history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(req.conversation_history.is_empty());
    }

    #[test]
    fn message_is_required() {
        let err = serde_json::from_str::<ChatRequest>(r#"{"conversationHistory": []}"#);
        assert!(err.is_err());
    }
}
