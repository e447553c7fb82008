//! Revenue reporting handlers.

mod build_revenue_realization;

pub use build_revenue_realization::{
    BuildRevenueRealizationHandler, BuildRevenueRealizationQuery,
};
