//! The internal result envelope handed from handlers to the transport edge.

use crate::notification::Notification;
use crate::page::PageDescriptor;

/// Shape of a successful payload.
///
/// The shape decides how the payload is rendered: a single value is always a
/// full response, an empty sequence has no content, and a page carries
/// navigation headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output<T> {
    /// One value.
    Single(T),
    /// A plain, unpaginated list.
    Sequence(Vec<T>),
    /// One page of a larger list.
    Page(PageDescriptor<T>),
}

/// Success/failure container returned by application handlers.
///
/// A well-formed envelope either carries an output (possibly with
/// informational notifications) or carries notifications describing why
/// there is no output. An envelope with neither is a malformed call.
///
/// `notifications` distinguishes "absent" (`None`) from "empty"
/// (`Some(vec![])`); both render the same way when there is no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEnvelope<T> {
    output: Option<Output<T>>,
    notifications: Option<Vec<Notification>>,
}

impl<T> ResultEnvelope<T> {
    /// Build an envelope from raw parts.
    #[must_use]
    pub const fn from_parts(
        output: Option<Output<T>>,
        notifications: Option<Vec<Notification>>,
    ) -> Self {
        Self {
            output,
            notifications,
        }
    }

    /// Successful envelope holding one value.
    #[must_use]
    pub const fn single(value: T) -> Self {
        Self::from_parts(Some(Output::Single(value)), Some(Vec::new()))
    }

    /// Successful envelope holding a plain list.
    #[must_use]
    pub const fn sequence(values: Vec<T>) -> Self {
        Self::from_parts(Some(Output::Sequence(values)), Some(Vec::new()))
    }

    /// Successful envelope holding one page of a list.
    #[must_use]
    pub const fn page(page: PageDescriptor<T>) -> Self {
        Self::from_parts(Some(Output::Page(page)), Some(Vec::new()))
    }

    /// Failed envelope described by `notifications`.
    #[must_use]
    pub const fn failure(notifications: Vec<Notification>) -> Self {
        Self::from_parts(None, Some(notifications))
    }

    /// Envelope with neither output nor notifications.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_parts(None, None)
    }

    /// Attach one more notification.
    #[must_use]
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notifications
            .get_or_insert_with(Vec::new)
            .push(notification);
        self
    }

    /// Attach several notifications.
    #[must_use]
    pub fn with_notifications(
        mut self,
        notifications: impl IntoIterator<Item = Notification>,
    ) -> Self {
        self.notifications
            .get_or_insert_with(Vec::new)
            .extend(notifications);
        self
    }

    /// The output, if any.
    #[must_use]
    pub const fn output(&self) -> Option<&Output<T>> {
        self.output.as_ref()
    }

    /// The notifications, or an empty slice when absent.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.as_deref().unwrap_or_default()
    }

    /// `true` when both output and notifications are absent.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.output.is_none() && self.notifications.is_none()
    }

    /// Consume the envelope.
    #[must_use]
    pub fn into_parts(self) -> (Option<Output<T>>, Vec<Notification>) {
        (self.output, self.notifications.unwrap_or_default())
    }
}

impl<T> From<Result<T, Vec<Notification>>> for ResultEnvelope<T> {
    fn from(result: Result<T, Vec<Notification>>) -> Self {
        match result {
            Ok(value) => Self::single(value),
            Err(notifications) => Self::failure(notifications),
        }
    }
}

impl<T> From<Notification> for ResultEnvelope<T> {
    fn from(notification: Notification) -> Self {
        Self::failure(vec![notification])
    }
}
