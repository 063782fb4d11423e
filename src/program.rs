use crate::ast::Node;
use crate::Backtrack;

/// One instruction of a compiled pattern. Jump targets are absolute
/// indices into the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    /// Consume one character equal to the operand.
    Char(char),
    /// Consume any one character.
    Any,
    /// Continue at `first`; on backtrack resume at `second`.
    Split { first: usize, second: usize },
    Jmp(usize),
    /// Store the current position in a register.
    Save(usize),
    /// Fail unless the position moved since the register was saved.
    Progress(usize),
    /// Open a committed region. If everything inside fails, resume at the
    /// target, or keep failing when there is none.
    Atomic(Option<usize>),
    /// Close the innermost committed region, dropping its choice points.
    Cut,
    /// Succeed if the whole text was consumed.
    Match,
}

/// Flat instruction list for one pattern.
///
/// Registers `2 * i` and `2 * i + 1` hold the start and end of group `i`;
/// each `*` gets one more register to detect repetitions that consume
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    insts: Vec<Inst>,
    group_count: usize,
    registers: usize,
}

impl Program {
    pub fn compile(root: Option<&Node>, group_count: usize, backtrack: Backtrack) -> Self {
        let mut compiler = Compiler {
            insts: Vec::new(),
            registers: 2 * (group_count + 1),
            backtrack,
        };
        if let Some(root) = root {
            compiler.compile(root);
        }
        compiler.insts.push(Inst::Match);

        Program {
            insts: compiler.insts,
            group_count,
            registers: compiler.registers,
        }
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn registers(&self) -> usize {
        self.registers
    }
}

// Pending work for the compiler. Nodes are expanded from an explicit
// stack so deep trees do not recurse.
enum Task<'n> {
    Node(&'n Node),
    Emit(Inst),
    CloseStar { split: usize, mark: usize },
    Else { split: usize, right: &'n Node },
    CommitElse { atomic: usize, right: &'n Node },
    Patch(usize),
}

struct Compiler {
    insts: Vec<Inst>,
    registers: usize,
    backtrack: Backtrack,
}

impl Compiler {
    fn emit(&mut self, inst: Inst) -> usize {
        self.insts.push(inst);
        self.insts.len() - 1
    }

    /// Point the open jump at `at` to the next instruction.
    fn patch(&mut self, at: usize) {
        let target = self.insts.len();
        match &mut self.insts[at] {
            Inst::Split { second, .. } => *second = target,
            Inst::Jmp(to) => *to = target,
            Inst::Atomic(to) => *to = Some(target),
            _ => {}
        }
    }

    fn alloc_register(&mut self) -> usize {
        let register = self.registers;
        self.registers += 1;
        register
    }

    fn compile(&mut self, root: &Node) {
        let mut tasks = vec![Task::Node(root)];
        while let Some(task) = tasks.pop() {
            match task {
                Task::Node(node) => self.expand(node, &mut tasks),
                Task::Emit(inst) => {
                    self.emit(inst);
                }
                // Progress(mark); Jmp split
                Task::CloseStar { split, mark } => {
                    self.emit(Inst::Progress(mark));
                    self.emit(Inst::Jmp(split));
                    self.patch(split);
                }
                // Jmp end; right: <R>; end:
                Task::Else { split, right } => {
                    let jmp = self.emit(Inst::Jmp(0));
                    self.patch(split);
                    tasks.push(Task::Patch(jmp));
                    tasks.push(Task::Node(right));
                }
                // Cut; Jmp end; right: Atomic(None); <R>; Cut; end:
                Task::CommitElse { atomic, right } => {
                    self.emit(Inst::Cut);
                    let jmp = self.emit(Inst::Jmp(0));
                    self.patch(atomic);
                    self.emit(Inst::Atomic(None));
                    tasks.push(Task::Patch(jmp));
                    tasks.push(Task::Emit(Inst::Cut));
                    tasks.push(Task::Node(right));
                }
                Task::Patch(at) => self.patch(at),
            }
        }
    }

    // Tasks are pushed in reverse of the order they must run.
    fn expand<'n>(&mut self, node: &'n Node, tasks: &mut Vec<Task<'n>>) {
        match node {
            Node::Literal(c) => {
                self.emit(Inst::Char(*c));
            }
            Node::Dot => {
                self.emit(Inst::Any);
            }
            Node::Concat(left, right) => {
                tasks.push(Task::Node(right));
                tasks.push(Task::Node(left));
            }
            // split: Split(body, end); body: Save(mark); <child>; ...CloseStar
            Node::Star(child) => {
                let first = self.insts.len() + 1;
                let split = self.emit(Inst::Split { first, second: 0 });
                let mark = self.alloc_register();
                self.emit(Inst::Save(mark));
                tasks.push(Task::CloseStar { split, mark });
                tasks.push(Task::Node(child));
            }
            Node::Alternation(left, right) => match self.backtrack {
                Backtrack::Full => {
                    let first = self.insts.len() + 1;
                    let split = self.emit(Inst::Split { first, second: 0 });
                    tasks.push(Task::Else {
                        split,
                        right: &**right,
                    });
                    tasks.push(Task::Node(left));
                }
                Backtrack::Committed => {
                    let atomic = self.emit(Inst::Atomic(None));
                    tasks.push(Task::CommitElse {
                        atomic,
                        right: &**right,
                    });
                    tasks.push(Task::Node(left));
                }
            },
            Node::Group { index, node } => {
                self.emit(Inst::Save(2 * index));
                tasks.push(Task::Emit(Inst::Save(2 * index + 1)));
                tasks.push(Task::Node(node));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::Dialect;
    use Inst::*;

    fn compile(pattern: &str, backtrack: Backtrack) -> Program {
        let mut parser = Parser::new(pattern, Dialect::Lenient).unwrap();
        let root = parser.parse().unwrap();
        Program::compile(root.as_ref(), parser.group_count(), backtrack)
    }

    #[test]
    fn empty_pattern_is_a_single_match() {
        assert_eq!(compile("", Backtrack::Committed).insts(), &[Match]);
    }

    #[test]
    fn concatenation_is_straight_line() {
        assert_eq!(
            compile("a.c", Backtrack::Committed).insts(),
            &[Char('a'), Any, Char('c'), Match]
        );
    }

    #[test]
    fn star_loops_through_progress_check() {
        let program = compile("a*", Backtrack::Committed);
        assert_eq!(
            program.insts(),
            &[
                Split { first: 1, second: 5 },
                Save(2),
                Char('a'),
                Progress(2),
                Jmp(0),
                Match,
            ]
        );
        assert_eq!(program.registers(), 3);
    }

    #[test]
    fn group_saves_start_and_end() {
        let program = compile("(a)", Backtrack::Committed);
        assert_eq!(program.insts(), &[Save(2), Char('a'), Save(3), Match]);
        assert_eq!(program.group_count(), 1);
    }

    #[test]
    fn full_alternation_is_a_split() {
        assert_eq!(
            compile("a|b", Backtrack::Full).insts(),
            &[
                Split { first: 1, second: 3 },
                Char('a'),
                Jmp(4),
                Char('b'),
                Match,
            ]
        );
    }

    #[test]
    fn committed_alternation_wraps_both_branches() {
        assert_eq!(
            compile("a|b", Backtrack::Committed).insts(),
            &[
                Atomic(Some(4)),
                Char('a'),
                Cut,
                Jmp(7),
                Atomic(None),
                Char('b'),
                Cut,
                Match,
            ]
        );
    }

    #[test]
    fn long_concatenation_compiles_without_recursion() {
        let pattern = "ab".repeat(20_000);
        let program = compile(&pattern, Backtrack::Committed);
        assert_eq!(program.insts().len(), 40_001);
    }
}
