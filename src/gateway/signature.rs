use crate::domain::event::WebhookPayload;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Recomputes the Wompi event checksum and compares it against the one the
/// gateway supplied. The secret is injected at construction; a deployment
/// without one never gets this far (config refuses to start).
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Signing chain per the Wompi contract: timestamp, transaction id,
    /// status, amount in cents, concatenated with no delimiter. The field
    /// order is fixed by the gateway and cannot be changed here.
    fn signing_chain(payload: &WebhookPayload) -> String {
        let tx = &payload.data.transaction;
        format!(
            "{}{}{}{}",
            payload.timestamp, tx.id, tx.status, tx.amount_in_cents
        )
    }

    pub fn compute(&self, payload: &WebhookPayload) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(Self::signing_chain(payload).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// True iff the supplied hex digest matches the recomputed one.
    /// Comparison is constant-time.
    pub fn verify(&self, payload: &WebhookPayload, supplied: &str) -> bool {
        let computed = self.compute(payload);
        computed.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}
