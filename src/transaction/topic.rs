use serde::{Deserialize, Serialize};

use super::{AnyTransactionData, Transaction, TransactionData};
use crate::entity_id::TopicId;

/// Delete a topic.
///
/// No more transactions or queries on the topic succeed afterwards. Must be
/// signed by the topic's admin key.
pub type TopicDeleteTransaction = Transaction<TopicDeleteTransactionData>;

/// Variant data of [`TopicDeleteTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicDeleteTransactionData {
    /// The topic to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
}

impl TransactionData for TopicDeleteTransactionData {
    const KIND: &'static str = "topicDelete";
}

impl From<TopicDeleteTransactionData> for AnyTransactionData {
    fn from(data: TopicDeleteTransactionData) -> Self {
        Self::TopicDelete(data)
    }
}

impl TopicDeleteTransaction {
    /// Returns the topic to delete.
    pub fn get_topic_id(&self) -> Option<TopicId> {
        self.body.data.topic_id
    }

    /// Sets the topic to delete.
    pub fn topic_id(&mut self, id: impl Into<TopicId>) -> &mut Self {
        self.body.data.topic_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::encode;

    #[test]
    fn test_serialize() {
        let mut transaction = TopicDeleteTransaction::new();
        transaction.topic_id(TopicId::from(1001));

        assert_eq!(
            encode(&transaction).unwrap(),
            r#"{"$type":"topicDelete","topicId":"0.0.1001"}"#
        );
        assert_eq!(transaction.get_topic_id(), Some(TopicId::from(1001)));
    }
}
