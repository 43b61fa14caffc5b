//! Depth-first traversal of a regex tree.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function,
//! which visits the node's children. An implementation overrides the
//! methods it cares about and calls the `walk_*` function to keep
//! descending.

use super::ast::{
    BackReference, Boundary, Character, CharacterClass, ClassElement, ClassIntersection,
    ClassRange, ClassUnion, Condition, Conditional, Disjunction, Dot, EscapedClass, Group,
    PosixClass, RegexTree, Repetition, Sequence,
};
use super::parser::RegexParseResult;

pub trait RegexVisitor {
    /// Visit a parse result; results with syntax errors are skipped.
    fn visit_parse_result(&mut self, result: &RegexParseResult) {
        if !result.has_errors() {
            self.visit_regex(&result.result);
        }
    }

    fn visit_regex(&mut self, tree: &RegexTree) {
        walk_regex(self, tree);
    }

    fn visit_sequence(&mut self, sequence: &Sequence) {
        walk_sequence(self, sequence);
    }

    fn visit_disjunction(&mut self, disjunction: &Disjunction) {
        walk_disjunction(self, disjunction);
    }

    fn visit_group(&mut self, group: &Group) {
        walk_group(self, group);
    }

    fn visit_conditional(&mut self, conditional: &Conditional) {
        walk_conditional(self, conditional);
    }

    fn visit_repetition(&mut self, repetition: &Repetition) {
        walk_repetition(self, repetition);
    }

    fn visit_character(&mut self, _character: &Character) {}

    fn visit_dot(&mut self, _dot: &Dot) {}

    fn visit_boundary(&mut self, _boundary: &Boundary) {}

    fn visit_back_reference(&mut self, _reference: &BackReference) {}

    fn visit_escaped_class(&mut self, _class: &EscapedClass) {}

    fn visit_character_class(&mut self, class: &CharacterClass) {
        walk_character_class(self, class);
    }

    fn visit_class_union(&mut self, union: &ClassUnion) {
        walk_class_union(self, union);
    }

    fn visit_class_element(&mut self, element: &ClassElement) {
        walk_class_element(self, element);
    }

    fn visit_class_range(&mut self, range: &ClassRange) {
        walk_class_range(self, range);
    }

    fn visit_posix_class(&mut self, _class: &PosixClass) {}

    fn visit_class_intersection(&mut self, intersection: &ClassIntersection) {
        walk_class_intersection(self, intersection);
    }
}

pub fn walk_regex<V: RegexVisitor + ?Sized>(visitor: &mut V, tree: &RegexTree) {
    match tree {
        RegexTree::Sequence(t) => visitor.visit_sequence(t),
        RegexTree::Disjunction(t) => visitor.visit_disjunction(t),
        RegexTree::Group(t) => visitor.visit_group(t),
        RegexTree::Conditional(t) => visitor.visit_conditional(t),
        RegexTree::Repetition(t) => visitor.visit_repetition(t),
        RegexTree::Character(t) => visitor.visit_character(t),
        RegexTree::Dot(t) => visitor.visit_dot(t),
        RegexTree::Boundary(t) => visitor.visit_boundary(t),
        RegexTree::BackReference(t) => visitor.visit_back_reference(t),
        RegexTree::EscapedClass(t) => visitor.visit_escaped_class(t),
        RegexTree::CharacterClass(t) => visitor.visit_character_class(t),
    }
}

pub fn walk_sequence<V: RegexVisitor + ?Sized>(visitor: &mut V, sequence: &Sequence) {
    for item in &sequence.items {
        visitor.visit_regex(item);
    }
}

pub fn walk_disjunction<V: RegexVisitor + ?Sized>(visitor: &mut V, disjunction: &Disjunction) {
    for alternative in &disjunction.alternatives {
        visitor.visit_regex(alternative);
    }
}

pub fn walk_group<V: RegexVisitor + ?Sized>(visitor: &mut V, group: &Group) {
    if let Some(element) = &group.element {
        visitor.visit_regex(element);
    }
}

pub fn walk_conditional<V: RegexVisitor + ?Sized>(visitor: &mut V, conditional: &Conditional) {
    if let Condition::Assertion(group) = &conditional.condition {
        visitor.visit_group(group);
    }
    visitor.visit_regex(&conditional.yes);
    if let Some(no) = &conditional.no {
        visitor.visit_regex(no);
    }
}

pub fn walk_repetition<V: RegexVisitor + ?Sized>(visitor: &mut V, repetition: &Repetition) {
    visitor.visit_regex(&repetition.element);
}

pub fn walk_character_class<V: RegexVisitor + ?Sized>(visitor: &mut V, class: &CharacterClass) {
    visitor.visit_class_union(&class.union);
}

pub fn walk_class_union<V: RegexVisitor + ?Sized>(visitor: &mut V, union: &ClassUnion) {
    for element in &union.elements {
        visitor.visit_class_element(element);
    }
}

pub fn walk_class_element<V: RegexVisitor + ?Sized>(visitor: &mut V, element: &ClassElement) {
    match element {
        ClassElement::Character(e) => visitor.visit_character(e),
        ClassElement::Range(e) => visitor.visit_class_range(e),
        ClassElement::EscapedClass(e) => visitor.visit_escaped_class(e),
        ClassElement::Posix(e) => visitor.visit_posix_class(e),
        ClassElement::Nested(e) => visitor.visit_character_class(e),
        ClassElement::Intersection(e) => visitor.visit_class_intersection(e),
    }
}

pub fn walk_class_range<V: RegexVisitor + ?Sized>(visitor: &mut V, range: &ClassRange) {
    visitor.visit_character(&range.from);
    visitor.visit_character(&range.to);
}

pub fn walk_class_intersection<V: RegexVisitor + ?Sized>(
    visitor: &mut V,
    intersection: &ClassIntersection,
) {
    for operand in &intersection.operands {
        visitor.visit_class_union(operand);
    }
}
