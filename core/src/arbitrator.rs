//! Resolution of overlapping candidates into output paths.
use crate::context::AnalyzeContext;
use crate::lexeme::Lexeme;
use crate::path::LexemePath;

/// Groups the pass's candidates into crossing groups and hands one path per
/// group to the context.
///
/// In smart mode an ambiguous group is reduced to the best non-crossing path
/// under [`LexemePath`]'s ordering; otherwise every candidate is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arbitrator;

impl Arbitrator {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, ctx: &mut AnalyzeContext) {
        let use_smart = ctx.use_smart();
        let mut group = LexemePath::new();
        while let Some(lexeme) = ctx.pop_candidate() {
            if let Err(lexeme) = try_cross(&mut group, lexeme) {
                let finished = std::mem::take(&mut group);
                ctx.add_lexeme_path(resolve(finished, use_smart));
                group.add_cross_lexeme(lexeme);
            }
        }
        if !group.is_empty() {
            ctx.add_lexeme_path(resolve(group, use_smart));
        }
    }
}

fn try_cross(group: &mut LexemePath, lexeme: Lexeme) -> Result<(), Lexeme> {
    if group.is_empty() || group.check_cross(&lexeme) {
        group.add_cross_lexeme(lexeme);
        Ok(())
    } else {
        Err(lexeme)
    }
}

fn resolve(group: LexemePath, use_smart: bool) -> LexemePath {
    if group.len() == 1 || !use_smart {
        group
    } else {
        judge(group.lexemes())
    }
}

/// Search the non-crossing paths through `group` (ordered candidates) and
/// return the best one.
///
/// A greedy forward pass collects the candidates it had to skip. Each skipped
/// candidate, newest first, is then tried by rolling the path back until it
/// fits and running forward again from it.
fn judge(group: &[Lexeme]) -> LexemePath {
    let mut option = LexemePath::new();
    let mut conflicts = forward_path(group, 0, &mut option);
    let mut best = option.clone();

    while let Some(index) = conflicts.pop() {
        back_path(&group[index], &mut option);
        forward_path(group, index, &mut option);
        if option < best {
            best = option.clone();
        }
    }
    best
}

/// Add candidates from `start` on; returns the indices that crossed.
fn forward_path(group: &[Lexeme], start: usize, option: &mut LexemePath) -> Vec<usize> {
    (start..group.len())
        .filter(|&i| !option.add_not_cross_lexeme(group[i].clone()))
        .collect()
}

fn back_path(lexeme: &Lexeme, option: &mut LexemePath) {
    while option.check_cross(lexeme) {
        option.remove_tail();
    }
}
