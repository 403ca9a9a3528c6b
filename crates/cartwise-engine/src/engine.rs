//! # Checkout Engine
//!
//! One handle for the storefront: reconcile a cart, then price what is left.
//!
//! ```text
//! ┌───────────────┐   reconcile_detailed   ┌────────────────┐   price   ┌─────────┐
//! │ raw cart      │ ─────────────────────► │ Reconciliation │ ────────► │ Quote   │
//! │ (requests)    │   (one catalog fetch)  │ items + notes  │ (pure)    │ totals  │
//! └───────────────┘                        └────────────────┘           └─────────┘
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use cartwise_core::{
    CartSummary, FeePolicy, LineItemRequest, Money, PricingResult, ReconciledLineItem,
    Reconciliation,
};

use crate::catalog::CatalogReader;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::reconciler::Reconciler;

/// A reconciled cart with its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    pub reconciliation: Reconciliation,
    pub pricing: PricingResult,
    /// Amount still needed to reach free shipping; zero once it applies.
    pub free_shipping_remaining: Money,
}

impl Quote {
    pub fn items(&self) -> &[ReconciledLineItem] {
        &self.reconciliation.items
    }
}

/// Reconciler plus fee policy.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    reconciler: Reconciler,
    policy: FeePolicy,
}

impl CheckoutEngine {
    pub fn new(reconciler: Reconciler, policy: FeePolicy) -> Self {
        CheckoutEngine { reconciler, policy }
    }

    /// Builds an engine from validated configuration.
    pub fn from_config(
        config: &EngineConfig,
        catalog: Arc<dyn CatalogReader>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let reconciler = Reconciler::new(catalog).with_fetch_timeout(config.fetch_timeout());
        Ok(Self::new(reconciler, config.fee_policy()))
    }

    pub fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Reconciles `requests` and prices the surviving lines.
    ///
    /// Fails exactly when reconciliation fails; pricing cannot.
    pub async fn quote(&self, requests: &[LineItemRequest]) -> EngineResult<Quote> {
        let reconciliation = self.reconciler.reconcile_detailed(requests).await?;
        let pricing = self.price(&reconciliation.items);

        Ok(Quote {
            free_shipping_remaining: self.policy.free_shipping_remaining(pricing.subtotal),
            reconciliation,
            pricing,
        })
    }

    pub async fn reconcile(
        &self,
        requests: &[LineItemRequest],
    ) -> EngineResult<Vec<ReconciledLineItem>> {
        self.reconciler.reconcile(requests).await
    }

    pub fn price(&self, items: &[ReconciledLineItem]) -> PricingResult {
        cartwise_core::price(items, &self.policy)
    }

    pub fn summarize(&self, items: &[ReconciledLineItem]) -> CartSummary {
        cartwise_core::summarize(items)
    }
}
