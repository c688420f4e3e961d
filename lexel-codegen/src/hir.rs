//! High-level intermediate representation of token patterns.
//!
//! Patterns are parsed with `regex-syntax`'s AST parser and lowered
//! into a small normalised algebra the graph knows how to thread. The
//! goal is to canonicalise the tree here so the graph never has to
//! transform regex constructs while wiring looping references.

use regex_syntax::ast::{self, Ast};

use crate::error::LowerError;
use crate::range::{self, Range, Scalar};

type Result<T> = std::result::Result<T, LowerError>;

/// The pattern algebra. `Concat` and `Alternation` never nest a single
/// child, `Class` ranges are sorted and pairwise disjoint, `Literal`
/// runs are never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hir {
    Empty,
    /// A run of scalar values matched verbatim.
    Literal(Vec<Scalar>),
    /// A set of disjoint, ascending scalar ranges.
    Class(Vec<Range>),
    Concat(Vec<Hir>),
    Alternation(Vec<Hir>),
    /// Zero or more repetitions, reluctant.
    Loop(Box<Hir>),
    /// Zero or one repetition.
    Maybe(Box<Hir>),
}

impl Hir {
    /// Build the HIR for a `token` pattern: every character matches
    /// itself, metacharacters included.
    pub fn token(literal: &str) -> Result<Hir> {
        let run: Vec<Scalar> = literal.chars().map(|c| c as Scalar).collect();

        if run.is_empty() {
            return Err(LowerError::NotSupportedRegexNode(
                "empty pattern".to_string(),
            ));
        }

        Ok(Hir::Literal(run))
    }

    /// Parse a `regex` pattern and lower it.
    pub fn regex(pattern: &str) -> Result<Hir> {
        let ast = ast::parse::Parser::new()
            .parse(pattern)
            .map_err(map_parse_error)?;

        lower(&ast)
    }

    /// Specificity score used to break ties between terminals that
    /// accept the same span. Longer literal runs outrank classes,
    /// open-ended repetition counts for nothing, and an alternation is
    /// only as specific as its weakest arm.
    pub fn priority(&self) -> usize {
        match self {
            Hir::Empty | Hir::Loop(_) | Hir::Maybe(_) => 0,
            Hir::Concat(concat) => concat.iter().map(Hir::priority).sum(),
            Hir::Alternation(alt) => alt.iter().map(Hir::priority).min().unwrap_or(0),
            Hir::Class(_) => 1,
            Hir::Literal(run) => 2 * run.len(),
        }
    }

    /// Whether the pattern accepts the empty string. Such patterns are
    /// rejected before graph construction: a zero-width accept either
    /// loops without progress or produces empty tokens.
    pub fn matches_empty(&self) -> bool {
        match self {
            Hir::Empty | Hir::Loop(_) | Hir::Maybe(_) => true,
            Hir::Literal(_) | Hir::Class(_) => false,
            Hir::Concat(children) => children.iter().all(Hir::matches_empty),
            Hir::Alternation(children) => children.iter().any(Hir::matches_empty),
        }
    }

    /// Flatten nested concatenations, drop empty children, and collapse
    /// a single survivor into itself.
    fn concat(children: Vec<Hir>) -> Hir {
        fn extend(hir: Hir, out: &mut Vec<Hir>) {
            match hir {
                Hir::Concat(nested) => {
                    for child in nested {
                        extend(child, out);
                    }
                }
                Hir::Empty => (),
                hir => out.push(hir),
            }
        }

        let mut out = Vec::with_capacity(children.len());

        for child in children {
            extend(child, &mut out);
        }

        match out.len() {
            0 => Hir::Empty,
            1 => out.remove(0),
            _ => Hir::Concat(out),
        }
    }

    /// Flatten nested alternations and collapse a single survivor.
    /// Empty children are kept; they make the whole alternation
    /// optional.
    fn alternation(children: Vec<Hir>) -> Hir {
        fn extend(hir: Hir, out: &mut Vec<Hir>) {
            match hir {
                Hir::Alternation(nested) => {
                    for child in nested {
                        extend(child, out);
                    }
                }
                hir => out.push(hir),
            }
        }

        let mut out = Vec::with_capacity(children.len());

        for child in children {
            extend(child, &mut out);
        }

        match out.len() {
            0 => Hir::Empty,
            1 => out.remove(0),
            _ => Hir::Alternation(out),
        }
    }
}

fn map_parse_error(err: ast::Error) -> LowerError {
    use ast::ErrorKind::*;

    match err.kind() {
        EscapeHexEmpty | EscapeHexInvalid | EscapeHexInvalidDigit | EscapeUnexpectedEof
        | EscapeUnrecognized => LowerError::InvalidEscapeCharacter,
        ClassRangeInvalid => LowerError::IncorrectCharRange,
        ClassRangeLiteral => LowerError::NotSupportedCharacterRangeKind,
        RepetitionCountInvalid => LowerError::InvalidRepetitionRange,
        RepetitionMissing => LowerError::NotSupportedRepetitionKind,
        _ => LowerError::NotSupportedRegexNode(err.to_string()),
    }
}

fn lower(ast: &Ast) -> Result<Hir> {
    match ast {
        Ast::Empty(_) => Ok(Hir::Empty),
        Ast::Flags(_) => Err(LowerError::NotSupportedQualification),
        Ast::Literal(literal) => Ok(Hir::Literal(vec![literal.c as Scalar])),
        Ast::Dot(_) => Ok(Hir::Class(vec![Range::total()])),
        Ast::Assertion(_) => Err(LowerError::NotSupportedAtomKind),
        Ast::ClassUnicode(_) => Err(LowerError::WiderUnicodeThanSupported),
        Ast::ClassPerl(_) => Err(LowerError::NotSupportedCharacterClass),
        Ast::ClassBracketed(class) => Ok(Hir::Class(class_ranges(class)?)),
        Ast::Repetition(repetition) => lower_repetition(repetition),
        Ast::Group(group) => lower_group(group),
        Ast::Alternation(alternation) => {
            let children = alternation
                .asts
                .iter()
                .map(lower)
                .collect::<Result<Vec<_>>>()?;

            Ok(Hir::alternation(children))
        }
        Ast::Concat(concat) => {
            let children = concat.asts.iter().map(lower).collect::<Result<Vec<_>>>()?;

            Ok(Hir::concat(children))
        }
    }
}

fn lower_group(group: &ast::Group) -> Result<Hir> {
    match &group.kind {
        ast::GroupKind::CaptureIndex(_) | ast::GroupKind::CaptureName { .. } => lower(&group.ast),
        ast::GroupKind::NonCapturing(flags) => {
            if flags.items.is_empty() {
                lower(&group.ast)
            } else {
                Err(LowerError::NotSupportedQualification)
            }
        }
    }
}

fn lower_repetition(repetition: &ast::Repetition) -> Result<Hir> {
    use ast::{RepetitionKind, RepetitionRange};

    // Open-ended greedy repetition would swallow input the rest of the
    // pattern needs, and a forward-only automaton cannot give it back.
    // Bounded repetition unrolls deterministically, so its greediness
    // flag is irrelevant here.
    let unbounded = matches!(
        &repetition.op.kind,
        RepetitionKind::ZeroOrMore
            | RepetitionKind::OneOrMore
            | RepetitionKind::Range(RepetitionRange::AtLeast(_))
    );

    if repetition.greedy && unbounded {
        return Err(LowerError::GreedyMatchingMore);
    }

    let child = lower(&repetition.ast)?;

    if child == Hir::Empty {
        return Ok(Hir::Empty);
    }

    let hir = match &repetition.op.kind {
        RepetitionKind::ZeroOrOne => Hir::Maybe(Box::new(child)),
        RepetitionKind::ZeroOrMore => Hir::Loop(Box::new(child)),
        RepetitionKind::OneOrMore => {
            Hir::concat(vec![child.clone(), Hir::Loop(Box::new(child))])
        }
        RepetitionKind::Range(range) => match range {
            RepetitionRange::Exactly(n) => {
                Hir::concat(vec![child; *n as usize])
            }
            RepetitionRange::AtLeast(n) => {
                let mut children = vec![child.clone(); *n as usize];
                children.push(Hir::Loop(Box::new(child)));

                Hir::concat(children)
            }
            RepetitionRange::Bounded(n, m) => {
                if m < n {
                    return Err(LowerError::InvalidRepetitionRange);
                }

                let mut children = vec![child.clone(); *n as usize];
                children.extend(vec![Hir::Maybe(Box::new(child)); (m - n) as usize]);

                Hir::concat(children)
            }
        },
    };

    Ok(hir)
}

fn class_ranges(class: &ast::ClassBracketed) -> Result<Vec<Range>> {
    let mut ranges = Vec::new();

    collect_set(&class.kind, &mut ranges)?;

    let ranges = range::coalesce(ranges);

    if class.negated {
        Ok(range::complement(ranges))
    } else {
        Ok(ranges)
    }
}

fn collect_set(set: &ast::ClassSet, out: &mut Vec<Range>) -> Result<()> {
    match set {
        ast::ClassSet::Item(item) => collect_item(item, out),
        ast::ClassSet::BinaryOp(_) => Err(LowerError::NotSupportedCharacterClass),
    }
}

fn collect_item(item: &ast::ClassSetItem, out: &mut Vec<Range>) -> Result<()> {
    match item {
        ast::ClassSetItem::Empty(_) => Ok(()),
        ast::ClassSetItem::Literal(literal) => {
            out.push(Range::from(literal.c));
            Ok(())
        }
        ast::ClassSetItem::Range(range) => {
            let (start, end) = (range.start.c as Scalar, range.end.c as Scalar);

            if end < start {
                return Err(LowerError::IncorrectCharRange);
            }

            out.push(Range::new(start, end));
            Ok(())
        }
        ast::ClassSetItem::Ascii(_) | ast::ClassSetItem::Perl(_) => {
            Err(LowerError::NotSupportedCharacterClass)
        }
        ast::ClassSetItem::Unicode(_) => Err(LowerError::WiderUnicodeThanSupported),
        ast::ClassSetItem::Bracketed(nested) => {
            out.extend(class_ranges(nested)?);
            Ok(())
        }
        ast::ClassSetItem::Union(union) => {
            for item in &union.items {
                collect_item(item, out)?;
            }
            Ok(())
        }
    }
}
