//! `storefront-products`: product and base-product domain model.
//!
//! A base product supplies inheritable defaults; a product supplies sparse
//! overrides and free-form extensions. [`resolver`] materializes the two into
//! a single canonical document and drives the override/revert editing state
//! machine; [`clone`] produces new products/bases under an identity contract.

pub mod clone;
pub mod product;
pub mod resolver;

pub use clone::{clone_base_product, clone_product, CloneBaseProductOptions, CloneProductOptions};
pub use product::{Audit, BaseProduct, IdentityRecord, Product};
pub use resolver::{
    begin_override, change_override, field_origin, is_overridden, resolve, revert, FieldOrigin,
    ResolvedProduct,
};
