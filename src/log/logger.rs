use crate::{
    consts::TODO_COMMENT_MARKER,
    document::Position,
    log::{LogMessage, MessageKind, Warning},
};

#[derive(Clone, Debug, Default, PartialEq)]
/// Non-fatal findings of a compile.
pub struct Logger {
    /// To-do comments.
    pub todo_comments: Vec<LogMessage>,
    /// Non-fatal errors in the story.
    pub warnings: Vec<LogMessage>,
}

impl Logger {
    pub(crate) fn add_todo(&mut self, comment: &str, document: &str, position: Position) {
        let without_marker = comment
            .trim_start()
            .trim_start_matches(TODO_COMMENT_MARKER)
            .trim();

        let message = MessageKind::Todo(without_marker.to_string());

        self.todo_comments.push(LogMessage::with_kind(
            message,
            Some(document),
            Some(position),
        ));
    }

    pub(crate) fn add_warning(
        &mut self,
        warning: Warning,
        document: Option<&str>,
        position: Option<Position>,
    ) {
        self.warnings.push(LogMessage::with_kind(
            MessageKind::Warning(warning),
            document,
            position,
        ));
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.todo_comments.is_empty() && self.warnings.is_empty()
    }

    /// Sort messages by document and position.
    pub(crate) fn sort(&mut self) {
        let key = |message: &LogMessage| (message.document.clone(), message.position);

        self.todo_comments.sort_by_key(key);
        self.warnings.sort_by_key(key);
    }
}

impl Logger {
    /// Iterate over every message, ordered by document and position.
    ///
    /// To-do comments come before warnings at the same position.
    pub fn iter(&self) -> impl Iterator<Item = &LogMessage> {
        let mut messages = self
            .todo_comments
            .iter()
            .chain(self.warnings.iter())
            .collect::<Vec<_>>();

        messages.sort_by(|a, b| (&a.document, a.position).cmp(&(&b.document, b.position)));
        messages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> Warning {
        Warning::EmptyScene {
            scene: "hall".to_string(),
        }
    }

    #[test]
    fn todo_markers_are_trimmed_from_comments() {
        let mut logger = Logger::default();

        logger.add_todo("  TODO: write the ending", "main", Position::line_start(0));

        assert_eq!(
            logger.todo_comments[0].message,
            MessageKind::Todo("write the ending".to_string())
        );
    }

    #[test]
    fn iterating_through_log_yields_warnings_in_order() {
        let mut logger = Logger::default();

        logger.add_warning(warning(), Some("main"), Some(Position::line_start(0)));
        logger.add_warning(warning(), Some("main"), Some(Position::line_start(1)));

        let logged_messages = logger.warnings.clone();
        let iter_messages = logger.iter().cloned().collect::<Vec<_>>();

        assert_eq!(iter_messages, logged_messages);
    }

    #[test]
    fn iterating_through_log_yields_comments_and_warnings_in_position_order() {
        let mut logger = Logger::default();

        logger.add_todo("Comment 1", "main", Position::line_start(1));
        logger.add_todo("Comment 2", "main", Position::line_start(2));
        logger.add_warning(warning(), Some("main"), Some(Position::line_start(0)));
        logger.add_warning(warning(), Some("main"), Some(Position::line_start(3)));

        let todo_comments = logger.todo_comments.clone();
        let warnings = logger.warnings.clone();

        let mut iter = logger.iter().cloned();

        assert_eq!(iter.next().unwrap(), warnings[0]);
        assert_eq!(iter.next().unwrap(), todo_comments[0]);
        assert_eq!(iter.next().unwrap(), todo_comments[1]);
        assert_eq!(iter.next().unwrap(), warnings[1]);
        assert!(iter.next().is_none());
    }

    #[test]
    fn sorting_orders_messages_by_document_then_position() {
        let mut logger = Logger::default();

        logger.add_warning(warning(), Some("b"), Some(Position::line_start(0)));
        logger.add_warning(warning(), Some("a"), Some(Position::line_start(5)));
        logger.add_warning(warning(), Some("a"), Some(Position::line_start(1)));
        logger.sort();

        let origins = logger
            .warnings
            .iter()
            .map(|message| (message.document.clone().unwrap(), message.position.unwrap().row))
            .collect::<Vec<_>>();

        assert_eq!(
            origins,
            vec![
                ("a".to_string(), 1),
                ("a".to_string(), 5),
                ("b".to_string(), 0)
            ]
        );
    }
}
