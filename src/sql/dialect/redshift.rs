//! Amazon Redshift SQL dialect.
//!
//! Redshift features:
//! - PostgreSQL-based syntax
//! - ANSI identifier quoting (`"`)
//! - `SELECT ... INTO` for staging result sets
//! - Distribution and sort keys (`DISTSTYLE`, `DISTKEY`, `SORTKEY`)
//! - Primary and foreign keys are informational only (not enforced)

use super::helpers;
use super::{SqlDialect, StagingStrategy};
use crate::design::TableDesign;
use crate::sql::token::TokenStream;

/// Amazon Redshift SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Redshift;

impl SqlDialect for Redshift {
    fn name(&self) -> &'static str {
        "redshift"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn staging_strategy(&self) -> StagingStrategy {
        StagingStrategy::SelectInto
    }

    fn emit_table_options(&self, design: &TableDesign) -> TokenStream {
        helpers::emit_distribution_clauses(design)
    }
}
