//! # oxide-dom
//!
//! An arena-backed HTML document tree, built and serialized by html5ever.
//!
//! This crate provides:
//! - Browser-grade parsing that repairs malformed markup instead of failing
//! - Index-addressed nodes that can be mutated in place and re-serialized
//! - Detection of whether the document skeleton was written or implied
//!
//! ## Parsing and Mutating
//!
//! ```rust
//! use oxide_dom::Document;
//!
//! let mut doc = Document::parse(r#"<form><input id="name" name="name"></form>"#).unwrap();
//! let input = doc.element_by_id("name").unwrap();
//! doc.set_attribute(input, "value", "Ferris");
//!
//! let form = doc.elements_by_tag_name(doc.root(), "form")[0];
//! assert_eq!(
//!     doc.outer_html(form),
//!     r#"<form><input id="name" name="name" value="Ferris"></form>"#
//! );
//! ```
//!
//! html5ever always builds the `<html>`, `<head>` and `<body>` elements.
//! [`Document::has_implied_wrapper`] reports whether the markup spelled any of
//! them out, so callers can strip the skeleton again on output.

pub mod document;
pub mod error;
pub mod node;
mod parser;
mod serialize;

pub use document::{Descendants, Document};
pub use error::{ParseError, TreeError};
pub use node::{Attribute, Element, NodeData, NodeId};
