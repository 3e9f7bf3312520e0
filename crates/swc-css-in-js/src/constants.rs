//! Shared naming constants for the transform.

/// Prefix applied to every generated class name (`cc-<fingerprint>`).
pub const CLASS_NAME_PREFIX: &str = "cc-";

/// Prefix applied to every generated custom property (`--var-<hash>`).
pub const CUSTOM_PROPERTY_PREFIX: &str = "--var-";

/// Runtime component that injects style rules before rendering its children.
pub const STYLE_BOUNDARY_COMPONENT: &str = "CC";

/// Runtime component that renders the injected style rules.
pub const STYLE_SHEET_COMPONENT: &str = "CS";

/// The styled tag factory exported by the styling library.
pub const STYLED_IMPORT_NAME: &str = "styled";

/// The render-prop component exported by the styling library.
pub const CLASS_NAMES_IMPORT_NAME: &str = "ClassNames";

/// Module origins that trigger the transform by default.
pub const DEFAULT_IMPORT_SOURCES: &[&str] = &["@compiled/css-in-js"];

/// CSS properties whose numeric values carry no implicit `px` unit.
pub const UNITLESS_PROPERTIES: &[&str] = &[
  "animation-iteration-count",
  "aspect-ratio",
  "border-image-outset",
  "border-image-slice",
  "border-image-width",
  "box-flex",
  "box-flex-group",
  "box-ordinal-group",
  "column-count",
  "columns",
  "flex",
  "flex-grow",
  "flex-negative",
  "flex-order",
  "flex-positive",
  "flex-shrink",
  "font-weight",
  "grid-area",
  "grid-column",
  "grid-column-end",
  "grid-column-span",
  "grid-column-start",
  "grid-row",
  "grid-row-end",
  "grid-row-span",
  "grid-row-start",
  "line-clamp",
  "line-height",
  "opacity",
  "order",
  "orphans",
  "tab-size",
  "widows",
  "z-index",
  "zoom",
];

/// True when a numeric object-form value for `property` should be emitted
/// without an implicit `px` suffix.
pub fn is_unitless_property(property: &str) -> bool {
  UNITLESS_PROPERTIES.contains(&property)
    || property.starts_with("--")
    || property.starts_with("-webkit-line-clamp")
}
