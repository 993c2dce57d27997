//! Wire DTOs for the remote engagement service

use serde::{Deserialize, Serialize};

use crate::domain::entity::decision::Decision;

/// Decision list as returned by the service
///
/// Accepts both a bare JSON array and a `{"decisions": [...]}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DecisionListDto {
    Bare(Vec<Decision>),
    Envelope { decisions: Vec<Decision> },
}

impl DecisionListDto {
    /// Unwrap the list, repairing any `readAt` that disagrees with `status`
    pub fn into_decisions(self) -> Vec<Decision> {
        let mut decisions = match self {
            DecisionListDto::Bare(decisions) | DecisionListDto::Envelope { decisions } => decisions,
        };
        for decision in decisions.iter_mut() {
            if decision.normalize_read_state() {
                tracing::warn!(
                    decision_id = %decision.id,
                    status = ?decision.status,
                    "Remote decision had an inconsistent readAt, repaired"
                );
            }
        }
        decisions
    }
}

/// Body of `PUT /decisions/{id}/read`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest<'a> {
    pub freelancer_id: &'a str,
}

/// Body of `POST /freelancers/verify`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest<'a> {
    pub freelancer_id: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decision_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "freelancerId": "FREEL123",
            "deliverableTitle": "Landing page",
            "decision": "approved",
            "adminId": "ADM1",
            "status": "sent",
            "createdAt": "2024-04-02T10:00:00Z"
        })
    }

    #[test]
    fn test_bare_and_enveloped_lists() {
        let bare: DecisionListDto =
            serde_json::from_value(json!([decision_json("D1"), decision_json("D2")])).unwrap();
        assert_eq!(bare.into_decisions().len(), 2);

        let wrapped: DecisionListDto =
            serde_json::from_value(json!({ "decisions": [decision_json("D3")] })).unwrap();
        let decisions = wrapped.into_decisions();
        assert_eq!(decisions[0].id, "D3");
        assert!(decisions[0].observation.is_empty());
        assert!(decisions[0].read_at.is_none());
    }

    #[test]
    fn test_read_without_timestamp_takes_created_at() {
        let mut raw = decision_json("D1");
        raw["status"] = json!("read");

        let list: DecisionListDto = serde_json::from_value(json!([raw])).unwrap();
        let decisions = list.into_decisions();
        assert_eq!(decisions[0].read_at, Some(decisions[0].created_at));
    }

    #[test]
    fn test_sent_with_timestamp_is_cleared() {
        let mut raw = decision_json("D1");
        raw["readAt"] = json!("2024-04-02T11:00:00Z");

        let list: DecisionListDto = serde_json::from_value(json!({ "decisions": [raw] })).unwrap();
        let decisions = list.into_decisions();
        assert!(decisions[0].is_unread());
        assert!(decisions[0].read_at.is_none());
    }

    #[test]
    fn test_request_bodies_are_camel_case() {
        let body = serde_json::to_value(VerifyRequest {
            freelancer_id: "FREEL123",
            email: "a@b.io",
        })
        .unwrap();
        assert_eq!(body, json!({ "freelancerId": "FREEL123", "email": "a@b.io" }));

        let body = serde_json::to_value(MarkReadRequest {
            freelancer_id: "FREEL123",
        })
        .unwrap();
        assert_eq!(body, json!({ "freelancerId": "FREEL123" }));
    }

    #[test]
    fn test_verify_response_defaults_to_false() {
        let resp: VerifyResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!resp.verified);
    }
}
