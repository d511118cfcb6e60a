//! Builds a [`Document`] from html5ever's tree builder.
//!
//! [`DocumentSink`] receives tree mutations from html5ever and applies them
//! to the arena. The tokenizer is driven through [`SkeletonWatch`], which
//! forwards every token to the tree builder and notes whether the markup
//! spelled out a doctype or any of the `<html>`, `<head>` and `<body>` tags.
//! html5ever always creates those elements, so the tokens are the only place
//! where implied and authored skeletons differ.

use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use html5ever::tree_builder::{
    ElementFlags, NodeOrText, QuirksMode, TreeBuilder, TreeBuilderOpts, TreeSink,
};
use html5ever::QualName;
use tracing::{trace, warn};

use crate::document::Document;
use crate::error::{ParseError, TreeError};
use crate::node::{Attribute, Element, NodeData, NodeId};

/// Parses markup into a document.
pub(crate) fn parse(html: &str) -> Result<Document, ParseError> {
    if html.is_empty() {
        return Err(ParseError::empty_input());
    }

    let watch = SkeletonWatch {
        builder: TreeBuilder::new(DocumentSink::default(), TreeBuilderOpts::default()),
        authored: Cell::new(false),
    };
    let tokenizer = Tokenizer::new(watch, TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));
    while let TokenizerResult::Script(_) = tokenizer.feed(&input) {}
    tokenizer.end();

    let SkeletonWatch { builder, authored } = tokenizer.sink;
    let mut doc = builder.sink.finish();
    if !authored.get() {
        doc.set_implied_wrapper(true);
        trace!("markup has no document skeleton, the parser implied one");
    }
    Ok(doc)
}

/// Token sink that records authored skeleton tags before handing each token
/// to the tree builder.
struct SkeletonWatch {
    builder: TreeBuilder<NodeId, DocumentSink>,
    authored: Cell<bool>,
}

impl TokenSink for SkeletonWatch {
    type Handle = NodeId;

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<NodeId> {
        match &token {
            Token::DoctypeToken(_) => self.authored.set(true),
            Token::TagToken(tag)
                if matches!(tag.kind, TagKind::StartTag)
                    && matches!(&*tag.name, "html" | "head" | "body") =>
            {
                self.authored.set(true);
            }
            _ => {}
        }
        self.builder.process_token(token, line_number)
    }

    fn end(&self) {
        self.builder.end();
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        self.builder
            .adjusted_current_node_present_but_not_in_html_namespace()
    }
}

/// Tree sink writing into the document arena.
///
/// Element names are kept with their namespace for the tree builder, which
/// asks for them while deciding insertion modes. `<template>` contents are
/// stored as ordinary children of the template element.
#[derive(Default)]
struct DocumentSink {
    doc: RefCell<Document>,
    names: RefCell<HashMap<NodeId, QualName>>,
    errors: RefCell<Vec<String>>,
}

impl DocumentSink {
    fn append_node(&self, parent: NodeId, child: NodeOrText<NodeId>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => report(doc.append_child(parent, node)),
            NodeOrText::AppendText(text) => doc.append_text(parent, &text),
        }
    }
}

fn report(result: Result<(), TreeError>) {
    if let Err(err) = result {
        warn!(%err, "tree builder produced an invalid mutation");
    }
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

fn convert_attributes(attrs: Vec<html5ever::Attribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|attr| Attribute::new(attribute_name(&attr.name), attr.value.to_string()))
        .collect()
}

impl TreeSink for DocumentSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Document {
        let mut doc = self.doc.into_inner();
        doc.set_parse_errors(self.errors.into_inner());
        doc
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!(%msg, "recovered from malformed markup");
        self.errors.borrow_mut().push(msg.into_owned());
    }

    fn get_document(&self) -> NodeId {
        self.doc.borrow().root()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> Ref<'a, QualName> {
        Ref::map(self.names.borrow(), |names| &names[target])
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        let element = Element {
            name: name.local.to_string(),
            attributes: convert_attributes(attrs),
        };
        let id = self.doc.borrow_mut().create_node(NodeData::Element(element));
        self.names.borrow_mut().insert(id, name);
        id
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.doc
            .borrow_mut()
            .create_node(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> NodeId {
        self.doc
            .borrow_mut()
            .create_node(NodeData::Comment(format!("?{target} {data}")))
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        self.append_node(*parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self.doc.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append_node(*prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.create_node(NodeData::Doctype(name.to_string()));
        report(doc.append_child(root, doctype));
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut doc = self.doc.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => {
                doc.detach(node);
                if doc.parent(*sibling).is_some() {
                    report(doc.insert_before(*sibling, node));
                }
            }
            NodeOrText::AppendText(text) => doc.insert_text_before(*sibling, &text),
        }
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<html5ever::Attribute>) {
        let mut doc = self.doc.borrow_mut();
        for attr in convert_attributes(attrs) {
            if !doc.has_attribute(*target, &attr.name) {
                doc.set_attribute(*target, &attr.name, attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.doc.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut doc = self.doc.borrow_mut();
        let children = doc.children(*node).to_vec();
        for child in children {
            report(doc.append_child(*new_parent, child));
        }
    }
}
