//! Plan catalog - the static list of subscription tiers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{PriceId, ValidationError};

/// A catalog entry describing a subscription tier and its price token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// Human-readable monthly price, e.g. `$29`.
    pub display_price: String,
    pub price_id: PriceId,
    /// Ordered feature bullet points.
    pub features: Vec<String>,
}

impl Plan {
    pub fn new<I, S>(
        name: impl Into<String>,
        display_price: impl Into<String>,
        price_id: PriceId,
        features: I,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("plan_name"));
        }
        Ok(Self {
            name,
            display_price: display_price.into(),
            price_id,
            features: features.into_iter().map(Into::into).collect(),
        })
    }

    /// Price with its billing period, e.g. `$29/month`.
    pub fn price_label(&self) -> String {
        format!("{}/month", self.display_price)
    }

    /// Label of the subscribe control when no attempt is running for it.
    pub fn subscribe_label(&self) -> String {
        format!("Subscribe to {}", self.name)
    }
}

/// Ordered, immutable set of plans keyed by price id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

struct EmbeddedPlan {
    name: &'static str,
    display_price: &'static str,
    price_id: &'static str,
    features: &'static [&'static str],
}

const EMBEDDED_PLANS: &[EmbeddedPlan] = &[
    EmbeddedPlan {
        name: "Starter",
        display_price: "$29",
        price_id: "price_starter_monthly",
        features: &["Feature 1", "Feature 2", "Feature 3"],
    },
    EmbeddedPlan {
        name: "Pro",
        display_price: "$99",
        price_id: "price_pro_monthly",
        features: &[
            "Everything in Starter",
            "Advanced Feature 1",
            "Advanced Feature 2",
        ],
    },
];

static DEFAULT_CATALOG: Lazy<PlanCatalog> = Lazy::new(|| {
    PlanCatalog::from_embedded(EMBEDDED_PLANS).expect("embedded plan catalog is valid")
});

impl PlanCatalog {
    /// Builds a catalog, rejecting duplicate price ids.
    pub fn new(plans: Vec<Plan>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.price_id.clone()) {
                return Err(ValidationError::duplicate(
                    "price_id",
                    plan.price_id.as_str(),
                ));
            }
        }
        Ok(Self { plans })
    }

    /// The catalog compiled into the binary.
    pub fn default_catalog() -> &'static PlanCatalog {
        &DEFAULT_CATALOG
    }

    fn from_embedded(embedded: &[EmbeddedPlan]) -> Result<Self, ValidationError> {
        let plans = embedded
            .iter()
            .map(|p| {
                Plan::new(
                    p.name,
                    p.display_price,
                    PriceId::new(p.price_id)?,
                    p.features.iter().copied(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(plans)
    }

    pub fn get(&self, price_id: &PriceId) -> Option<&Plan> {
        self.plans.iter().find(|p| &p.price_id == price_id)
    }

    pub fn contains(&self, price_id: &PriceId) -> bool {
        self.get(price_id).is_some()
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
