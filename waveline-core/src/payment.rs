use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waveline_booking::PaymentMethod;

/// Outcome of a charge attempt at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayDecision {
    Approved,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayReceipt {
    /// Provider-side reference (e.g., ch_1a2b3c).
    pub provider_reference: String,
    pub amount_cents: i64,
    pub decision: GatewayDecision,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorize and capture a charge.
    async fn charge(
        &self,
        amount_cents: i64,
        method: PaymentMethod,
    ) -> Result<GatewayReceipt, GatewayError>;

    /// Return funds for a previous charge.
    async fn refund(
        &self,
        provider_reference: &str,
        amount_cents: i64,
    ) -> Result<GatewayReceipt, GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Charge declined: {0}")]
    Declined(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// In-process stand-in for a real payment provider. Approves every
/// well-formed charge and manufactures provider references.
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(
        &self,
        amount_cents: i64,
        method: PaymentMethod,
    ) -> Result<GatewayReceipt, GatewayError> {
        if amount_cents <= 0 {
            return Err(GatewayError::Declined(format!(
                "non-positive amount {}",
                amount_cents
            )));
        }

        tracing::info!(amount_cents, method = %method, "simulated gateway approved charge");

        Ok(GatewayReceipt {
            provider_reference: format!("ch_{}", Uuid::new_v4().simple()),
            amount_cents,
            decision: GatewayDecision::Approved,
        })
    }

    async fn refund(
        &self,
        provider_reference: &str,
        amount_cents: i64,
    ) -> Result<GatewayReceipt, GatewayError> {
        tracing::info!(provider_reference, amount_cents, "simulated gateway issued refund");

        Ok(GatewayReceipt {
            provider_reference: format!("re_{}", Uuid::new_v4().simple()),
            amount_cents,
            decision: GatewayDecision::Approved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_gateway_approves_charges() {
        let gateway = SimulatedGateway;
        let receipt = gateway.charge(150_00, PaymentMethod::Gcash).await.unwrap();
        assert_eq!(receipt.decision, GatewayDecision::Approved);
        assert!(receipt.provider_reference.starts_with("ch_"));
    }

    #[tokio::test]
    async fn test_simulated_gateway_declines_zero_amounts() {
        let gateway = SimulatedGateway;
        let result = gateway.charge(0, PaymentMethod::Cash).await;
        assert!(matches!(result, Err(GatewayError::Declined(_))));
    }
}
