use crate::program::{Inst, Program};

/// Capture slots for one match attempt, as char ranges. Slot 0 is the
/// whole text, slot `i` is group `i`.
pub type Slots = Vec<Option<(usize, usize)>>;

// Backtrack stack entry.
#[derive(Debug)]
enum Frame {
    /// Alternative left by a `Split`.
    Branch { pc: usize, pos: usize },
    /// Opened by `Atomic`, removed again by `Cut`.
    Barrier { pc: Option<usize>, pos: usize },
    /// Register value to put back when backtracking past a `Save`.
    Restore { register: usize, value: Option<usize> },
}

/// Runs a compiled program against one text.
///
/// Choice points live on an explicit stack, so neither the text length nor
/// the pattern length adds to the call depth.
pub struct Matcher<'p, 't> {
    program: &'p Program,
    text: &'t [char],
}

impl<'p, 't> Matcher<'p, 't> {
    pub fn new(program: &'p Program, text: &'t [char]) -> Self {
        Self { program, text }
    }

    /// Anchored match against the whole text. Returns the group slots of
    /// the first successful path.
    pub fn run(&self) -> Option<Slots> {
        let insts = self.program.insts();
        let mut registers: Vec<Option<usize>> = vec![None; self.program.registers()];
        let mut stack: Vec<Frame> = Vec::new();
        let mut pc = 0;
        let mut pos = 0;

        loop {
            let advanced = match insts[pc] {
                Inst::Char(c) => {
                    let ok = self.text.get(pos) == Some(&c);
                    if ok {
                        pos += 1;
                        pc += 1;
                    }
                    ok
                }
                Inst::Any => {
                    let ok = pos < self.text.len();
                    if ok {
                        pos += 1;
                        pc += 1;
                    }
                    ok
                }
                Inst::Split { first, second } => {
                    stack.push(Frame::Branch { pc: second, pos });
                    pc = first;
                    true
                }
                Inst::Jmp(to) => {
                    pc = to;
                    true
                }
                Inst::Save(register) => {
                    let value = registers[register].replace(pos);
                    stack.push(Frame::Restore { register, value });
                    pc += 1;
                    true
                }
                Inst::Progress(register) => {
                    let ok = registers[register] != Some(pos);
                    if ok {
                        pc += 1;
                    }
                    ok
                }
                Inst::Atomic(resume) => {
                    stack.push(Frame::Barrier { pc: resume, pos });
                    pc += 1;
                    true
                }
                Inst::Cut => {
                    cut(&mut stack);
                    pc += 1;
                    true
                }
                Inst::Match => {
                    if pos == self.text.len() {
                        return Some(self.slots(&registers));
                    }
                    false
                }
            };
            if advanced {
                continue;
            }

            // Unwind to the most recent choice point.
            loop {
                match stack.pop() {
                    None => return None,
                    Some(Frame::Restore { register, value }) => registers[register] = value,
                    Some(Frame::Branch { pc: to, pos: at })
                    | Some(Frame::Barrier {
                        pc: Some(to),
                        pos: at,
                    }) => {
                        pc = to;
                        pos = at;
                        break;
                    }
                    Some(Frame::Barrier { pc: None, .. }) => {}
                }
            }
        }
    }

    fn slots(&self, registers: &[Option<usize>]) -> Slots {
        let mut slots: Slots = (0..=self.program.group_count())
            .map(|i| match (registers[2 * i], registers[2 * i + 1]) {
                (Some(start), Some(end)) => Some((start, end)),
                _ => None,
            })
            .collect();
        slots[0] = Some((0, self.text.len()));
        slots
    }
}

// Drop the choice points of the innermost committed region, keeping the
// register restores so captures made inside it still unwind.
fn cut(stack: &mut Vec<Frame>) {
    let mut kept = Vec::new();
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Barrier { .. } => break,
            Frame::Restore { .. } => kept.push(frame),
            Frame::Branch { .. } => {}
        }
    }
    stack.extend(kept.into_iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::{Backtrack, Dialect};

    fn run(pattern: &str, text: &str, backtrack: Backtrack) -> Option<Slots> {
        let mut parser = Parser::new(pattern, Dialect::Lenient).unwrap();
        let root = parser.parse().unwrap();
        let program = Program::compile(root.as_ref(), parser.group_count(), backtrack);
        let chars: Vec<char> = text.chars().collect();
        Matcher::new(&program, &chars).run()
    }

    fn committed(pattern: &str, text: &str) -> bool {
        run(pattern, text, Backtrack::Committed).is_some()
    }

    fn full(pattern: &str, text: &str) -> bool {
        run(pattern, text, Backtrack::Full).is_some()
    }

    #[test]
    fn star_releases_repetitions_to_what_follows() {
        assert!(committed("a*a", "aaaa"));
        assert!(committed("a*aa", "aa"));
        assert!(!committed("a*aa", "a"));
        assert!(committed(".*b.", "aaaabc"));
    }

    #[test]
    fn star_of_nullable_child_terminates() {
        assert!(committed("(a*)*", "aaa"));
        assert!(committed("(a*)*b", "b"));
        assert!(!committed("(a*)*", "ab"));
    }

    #[test]
    fn committed_alternation_never_retries_right_branch() {
        assert!(!committed("(a|ab)c", "abc"));
        assert!(full("(a|ab)c", "abc"));
        assert!(committed("(ab|a)c", "abc"));
        assert!(committed("(a|ab)c", "ac"));
    }

    #[test]
    fn committed_alternation_fixes_greedy_end_of_left_branch() {
        assert!(!committed("(a*|b)a", "aa"));
        assert!(full("(a*|b)a", "aa"));
    }

    #[test]
    fn alternation_falls_back_to_right_branch_when_left_fails() {
        assert!(committed("a|b", "b"));
        assert!(!committed("a|b*", "bbc"));
        assert!(!full("a|b*", "bbc"));
        assert!(committed("a|b*", "bb"));
    }

    #[test]
    fn empty_root_matches_only_empty_text() {
        assert!(committed("", ""));
        assert!(!committed("", "a"));
    }

    #[test]
    fn group_slot_keeps_last_iteration() {
        let slots = run("(ab)*", "abab", Backtrack::Committed).unwrap();
        assert_eq!(slots, vec![Some((0, 4)), Some((2, 4))]);
    }

    #[test]
    fn group_slot_is_restored_after_failed_branch() {
        // Group 1 first captures "a", then the branch fails on `b`.
        for backtrack in [Backtrack::Committed, Backtrack::Full] {
            let slots = run("(a)b|ac", "ac", backtrack).unwrap();
            assert_eq!(slots, vec![Some((0, 2)), None]);
        }
    }

    #[test]
    fn committed_branch_failure_restores_slots() {
        assert_eq!(run("((a)|b)c", "ab", Backtrack::Committed), None);
        let slots = run("(x|(a))*a", "a", Backtrack::Committed).unwrap();
        assert_eq!(slots, vec![Some((0, 1)), None, None]);
    }

    #[test]
    fn nested_committed_regions_unwind_in_order() {
        assert!(committed("((a|b)|c)*d", "abcabd"));
        assert!(!committed("((a|ab)|c)d", "abd"));
        assert!(full("((a|ab)|c)d", "abd"));
    }

    #[test]
    fn long_repetition_runs_without_deep_recursion() {
        let text = "ab".repeat(50_000);
        let slots = run("(ab)*", &text, Backtrack::Committed).unwrap();
        assert_eq!(slots[1], Some((99_998, 100_000)));
        assert!(committed(".*b", &text));
    }
}
