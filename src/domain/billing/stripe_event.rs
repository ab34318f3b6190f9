//! Stripe webhook event parsing.
//!
//! Only the fields the billing flow reads are captured; the rest of
//! Stripe's event schema is ignored.

use serde::{Deserialize, Serialize};

/// A Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Event id (evt_... format).
    pub id: String,

    /// Raw event type string, e.g. "payment_intent.succeeded".
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp at which the event was created.
    pub created: i64,

    pub data: StripeEventData,

    pub livemode: bool,

    #[serde(default)]
    pub api_version: String,
}

/// Container for the event's polymorphic payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,

    /// Previous values of changed attributes, on update events only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Deserializes the data object as the given type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_str(&self.event_type)
    }
}

/// Event types the webhook handler dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// A payment intent completed; confirms a single-document purchase.
    PaymentIntentSucceeded,
    CustomerSubscriptionCreated,
    CustomerSubscriptionUpdated,
    CustomerSubscriptionDeleted,
    /// Anything else; acknowledged without side effects.
    Unknown,
}

impl StripeEventType {
    pub fn from_str(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "customer.subscription.created" => Self::CustomerSubscriptionCreated,
            "customer.subscription.updated" => Self::CustomerSubscriptionUpdated,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::CustomerSubscriptionCreated => "customer.subscription.created",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::Unknown => "unknown",
        }
    }
}

/// Payment-intent object, as carried by `payment_intent.succeeded`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentObject {
    /// Payment intent id (pi_...).
    pub id: String,

    #[serde(default)]
    pub metadata: PaymentIntentMetadata,
}

/// Metadata this service attaches when creating a payment intent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentIntentMetadata {
    /// Discriminator for the purchase flow ("single_document").
    #[serde(rename = "type")]
    pub purchase_type: Option<String>,

    pub document_id: Option<String>,
    pub user_id: Option<String>,
    pub guest_email: Option<String>,
}

impl PaymentIntentObject {
    /// True if the intent was created by the single-document flow.
    pub fn is_single_document(&self) -> bool {
        self.metadata.purchase_type.as_deref() == Some("single_document")
    }
}

/// Subscription object, as carried by `customer.subscription.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionObject {
    /// Subscription id (sub_...).
    pub id: String,

    /// Processor status string ("active", "canceled", ...).
    pub status: String,

    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,

    #[serde(default)]
    pub cancel_at_period_end: bool,

    #[serde(default)]
    pub metadata: SubscriptionMetadata,

    /// First subscription item's price, when expanded.
    pub plan: Option<SubscriptionPlan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionMetadata {
    pub user_id: Option<String>,
    pub plan_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionPlan {
    pub id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

/// Builder for test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    previous_attributes: Option<serde_json::Value>,
    livemode: bool,
    api_version: String,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_1".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            previous_attributes: None,
            livemode: false,
            api_version: "2023-10-16".to_string(),
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn previous_attributes(mut self, attrs: serde_json::Value) -> Self {
        self.previous_attributes = Some(attrs);
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: self.previous_attributes,
            },
            livemode: self.livemode,
            api_version: self.api_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": { "object": {} },
            "livemode": false,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.parsed_type(), StripeEventType::PaymentIntentSucceeded);
        assert!(!event.livemode);
    }

    #[test]
    fn deserialize_event_with_previous_attributes() {
        let json = r#"{
            "id": "evt_update",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": {
                "object": {"status": "active"},
                "previous_attributes": {"status": "past_due"}
            },
            "livemode": true,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        let prev = event.data.previous_attributes.unwrap();
        assert_eq!(prev["status"], "past_due");
    }

    #[test]
    fn event_type_mapping_roundtrips() {
        for event_type in [
            StripeEventType::PaymentIntentSucceeded,
            StripeEventType::CustomerSubscriptionCreated,
            StripeEventType::CustomerSubscriptionUpdated,
            StripeEventType::CustomerSubscriptionDeleted,
        ] {
            assert_eq!(StripeEventType::from_str(event_type.as_str()), event_type);
        }
        assert_eq!(
            StripeEventType::from_str("invoice.payment_failed"),
            StripeEventType::Unknown
        );
    }

    #[test]
    fn payment_intent_object_reads_metadata() {
        let event = StripeEventBuilder::new()
            .object(json!({
                "id": "pi_abc",
                "metadata": {
                    "type": "single_document",
                    "document_id": "9b9e6f66-3aab-4c1e-9bb3-111111111111",
                    "guest_email": "a@b.com"
                }
            }))
            .build();

        let intent: PaymentIntentObject = event.deserialize_object().unwrap();
        assert_eq!(intent.id, "pi_abc");
        assert!(intent.is_single_document());
        assert_eq!(intent.metadata.guest_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn payment_intent_without_metadata_is_not_single_document() {
        let event = StripeEventBuilder::new()
            .object(json!({"id": "pi_plain"}))
            .build();

        let intent: PaymentIntentObject = event.deserialize_object().unwrap();
        assert!(!intent.is_single_document());
    }

    #[test]
    fn subscription_object_reads_period_and_plan() {
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.updated")
            .object(json!({
                "id": "sub_1",
                "status": "active",
                "current_period_start": 1704067200,
                "current_period_end": 1706745600,
                "cancel_at_period_end": true,
                "metadata": {"user_id": "u1", "plan_name": "pro"},
                "plan": {"id": "price_pro", "amount": 1999, "currency": "usd"}
            }))
            .build();

        let sub: SubscriptionObject = event.deserialize_object().unwrap();
        assert_eq!(sub.status, "active");
        assert_eq!(sub.current_period_end, Some(1706745600));
        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.metadata.user_id.as_deref(), Some("u1"));
        assert_eq!(sub.plan.unwrap().amount, Some(1999));
    }

    #[test]
    fn deserialize_object_fails_for_wrong_shape() {
        let event = StripeEventBuilder::new()
            .object(json!({"status": "active"}))
            .build();

        let result: Result<SubscriptionObject, _> = event.deserialize_object();
        assert!(result.is_err());
    }
}
