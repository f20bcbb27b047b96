//! The collection result extracted from the council website.

use std::fmt;

pub(crate) static UNKNOWN: &str = "Unknown";

static ERROR_DAY: &str = "Error";
static ERROR_KIND: &str = "Unable to retrieve collection data";

/// The next bin collection of a property.
///
/// A special message is only present when the council announced an irregular collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionResult {
    day: String,
    kind: String,
    special_message: Option<String>,
}

impl CollectionResult {
    /// Create a result.
    ///
    /// A special message which is blank or repeats the day or the kind is dropped.
    pub fn new(
        day: impl Into<String>,
        kind: impl Into<String>,
        special_message: Option<String>,
    ) -> Self {
        let day = day.into();
        let kind = kind.into();
        let special_message = special_message.filter(|message| {
            let message = message.trim();
            !message.is_empty() && message != day && message != kind
        });
        Self {
            day,
            kind,
            special_message,
        }
    }

    /// The result used when nothing could be extracted.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, None)
    }

    /// The result used when the council website could not be reached.
    pub fn fetch_error() -> Self {
        Self::new(ERROR_DAY, ERROR_KIND, None)
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn special_message(&self) -> Option<&str> {
        self.special_message.as_deref()
    }

    /// Format the reminder sent to every notification channel.
    pub fn message(&self) -> String {
        match &self.special_message {
            Some(special_message) => format!(
                "IMPORTANT: {special_message} - {} - {}",
                self.day, self.kind
            ),
            None => format!("Reminder: {} - {}", self.day, self.kind),
        }
    }
}

impl Default for CollectionResult {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CollectionResult {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.day, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use crate::collection::CollectionResult;

    #[test]
    fn test_message_reminder() {
        let result = CollectionResult::new("Wednesday 7 May", "It's recycling week", None);
        assert_eq!(
            result.message(),
            "Reminder: Wednesday 7 May - It's recycling week"
        );
    }

    #[test]
    fn test_message_important() {
        let result = CollectionResult::new(
            "Wednesday 7 May",
            "It's recycling week",
            Some(String::from("Your usual collection day is different this week")),
        );
        assert_eq!(
            result.message(),
            concat!(
                "IMPORTANT: Your usual collection day is different this week",
                " - Wednesday 7 May - It's recycling week",
            )
        );
    }

    #[test]
    fn test_message_fetch_error() {
        assert_eq!(
            CollectionResult::fetch_error().message(),
            "Reminder: Error - Unable to retrieve collection data"
        );
    }

    #[test]
    fn test_blank_special_message_is_dropped() {
        let result = CollectionResult::new("Monday", "Rubbish week", Some(String::from("  ")));
        assert_eq!(result.special_message(), None);
        assert_eq!(result.message(), "Reminder: Monday - Rubbish week");
    }

    #[test]
    fn test_special_message_repeating_day_or_kind_is_dropped() {
        let result = CollectionResult::new("Monday", "Rubbish week", Some(String::from("Monday")));
        assert_eq!(result.special_message(), None);
        let result = CollectionResult::new(
            "Monday",
            "Rubbish week",
            Some(String::from("Rubbish week")),
        );
        assert_eq!(result.special_message(), None);
        assert_eq!(result.message(), "Reminder: Monday - Rubbish week");
    }

    #[test]
    fn test_display() {
        let result = CollectionResult::new("Monday", "Rubbish week", None);
        assert_eq!(result.to_string(), "Monday: Rubbish week");
        assert_eq!(CollectionResult::default(), CollectionResult::unknown());
    }
}
