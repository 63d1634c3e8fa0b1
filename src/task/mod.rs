//! Task composition core.
//!
//! A [`Task<A>`] is an opaque description of "eventually produce an `A`,
//! possibly by interpreting zero or more effects". Construction never
//! performs I/O and `and_then` continuations are never invoked until an
//! interpreter reaches them, so a task can be built, inspected, and
//! discarded without side effects.
//!
//! Heterogeneous composition (bind, parallel, race) erases branch result
//! types behind `Box<dyn Any + Send>`, the same explicit-boxing trade the
//! `futures` ecosystem makes; typed constructors decode values back out and
//! surface a shape mismatch as an internal error.

pub mod ops;

use std::any::Any;

use crate::effect::{Effect, EffectOutcome};
use crate::error::TaskError;

/// Type-erased branch value used by bind/parallel/race nodes.
pub(crate) type BoxedValue = Box<dyn Any + Send>;

type Thunk<A> = Box<dyn FnOnce() -> Task<A> + Send>;
type EffectResume<A> = Box<dyn FnOnce(EffectOutcome) -> Task<A> + Send>;
type BindResume<A> = Box<dyn FnOnce(BoxedValue) -> Task<A> + Send>;
type JoinResume<A> = Box<dyn FnOnce(Vec<BoxedValue>) -> Task<A> + Send>;
type Rescue<A> = Box<dyn FnOnce(TaskError) -> Task<A> + Send>;

/// The task tree walked by interpreters.
pub(crate) enum Node<A> {
    Pure(A),
    Fail(TaskError),
    /// Deferred construction ([`Task::from_fn`]).
    Suspend(Thunk<A>),
    /// A leaf effect plus the decoder for its outcome.
    Effect {
        effect: Effect,
        resume: EffectResume<A>,
    },
    /// Sequential dependency: run `first`, feed its value to `resume`.
    Bind {
        first: Box<Task<BoxedValue>>,
        resume: BindResume<A>,
    },
    /// Run all branches concurrently; aggregate order is input order.
    Parallel {
        branches: Vec<Task<BoxedValue>>,
        resume: JoinResume<A>,
    },
    /// First branch to settle wins; losers are left to finish unobserved.
    Race {
        branches: Vec<Task<BoxedValue>>,
        resume: BindResume<A>,
    },
    /// Failure handler scoped to `attempt` only.
    Recover {
        attempt: Box<Task<A>>,
        rescue: Rescue<A>,
    },
}

/// A composable description of a computation that may involve effects.
pub struct Task<A> {
    pub(crate) node: Node<A>,
}

impl<A: Send + 'static> Task<A> {
    /// A task with no effects that resolves to `value`.
    pub fn pure(value: A) -> Self {
        Task { node: Node::Pure(value) }
    }

    /// A task that fails without performing anything.
    pub fn fail(error: TaskError) -> Self {
        Task { node: Node::Fail(error) }
    }

    /// Lift a `Result` into a task.
    pub fn from_result(result: Result<A, TaskError>) -> Self {
        match result {
            Ok(value) => Task::pure(value),
            Err(error) => Task::fail(error),
        }
    }

    /// Defer task construction until interpretation reaches this point.
    ///
    /// Useful for recursive task builders and for keeping expensive
    /// construction out of the eager path.
    pub fn from_fn<F>(build: F) -> Self
    where
        F: FnOnce() -> Task<A> + Send + 'static,
    {
        Task {
            node: Node::Suspend(Box::new(build)),
        }
    }

    /// Wrap a single effect with its outcome decoder.
    pub(crate) fn from_effect<F>(effect: Effect, decode: F) -> Self
    where
        F: FnOnce(EffectOutcome) -> Result<A, TaskError> + Send + 'static,
    {
        Task {
            node: Node::Effect {
                effect,
                resume: Box::new(move |outcome| Task::from_result(decode(outcome))),
            },
        }
    }

    /// Sequential dependency. `f` runs only when interpretation reaches it.
    pub fn and_then<B, F>(self, f: F) -> Task<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Task<B> + Send + 'static,
    {
        Task {
            node: Node::Bind {
                first: Box::new(self.erase()),
                resume: Box::new(move |boxed| match boxed.downcast::<A>() {
                    Ok(value) => f(*value),
                    Err(_) => Task::fail(TaskError::internal(
                        "bind continuation received a value of the wrong type",
                    )),
                }),
            },
        }
    }

    /// Transform the result without describing further effects.
    pub fn map<B, F>(self, f: F) -> Task<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        self.and_then(|value| Task::pure(f(value)))
    }

    /// Handle a failure of this task (and only this task) by producing a
    /// replacement.
    pub fn recover<F>(self, rescue: F) -> Task<A>
    where
        F: FnOnce(TaskError) -> Task<A> + Send + 'static,
    {
        Task {
            node: Node::Recover {
                attempt: Box::new(self),
                rescue: Box::new(rescue),
            },
        }
    }

    /// Run tasks strictly left to right, collecting results. The first
    /// failure stops the walk; later tasks are never started.
    pub fn sequence(tasks: Vec<Task<A>>) -> Task<Vec<A>> {
        tasks
            .into_iter()
            .fold(Task::pure(Vec::new()), |acc, task| {
                acc.and_then(move |mut results| {
                    task.map(move |value| {
                        results.push(value);
                        results
                    })
                })
            })
    }

    /// [`Task::sequence`] with the results discarded.
    pub fn sequence_unit(tasks: Vec<Task<A>>) -> Task<()> {
        Task::sequence(tasks).map(|_| ())
    }

    /// Run all tasks concurrently. Every branch is started eagerly; the
    /// aggregate result order matches input order, not completion order,
    /// and a failure is reported only after all branches settle.
    pub fn parallel(tasks: Vec<Task<A>>) -> Task<Vec<A>> {
        let branches: Vec<Task<BoxedValue>> = tasks.into_iter().map(Task::erase).collect();
        Task {
            node: Node::Parallel {
                branches,
                resume: Box::new(|values| {
                    let mut results = Vec::with_capacity(values.len());
                    for value in values {
                        match value.downcast::<A>() {
                            Ok(v) => results.push(*v),
                            Err(_) => {
                                return Task::fail(TaskError::internal(
                                    "parallel branch resolved to the wrong type",
                                ))
                            }
                        }
                    }
                    Task::pure(results)
                }),
            },
        }
    }

    /// Resolve with the first task to settle, success or failure.
    /// Interpreting a race over zero tasks fails fast.
    pub fn race(tasks: Vec<Task<A>>) -> Task<A> {
        let branches: Vec<Task<BoxedValue>> = tasks.into_iter().map(Task::erase).collect();
        Task {
            node: Node::Race {
                branches,
                resume: Box::new(|value| match value.downcast::<A>() {
                    Ok(v) => Task::pure(*v),
                    Err(_) => Task::fail(TaskError::internal(
                        "race winner resolved to the wrong type",
                    )),
                }),
            },
        }
    }

    /// Erase the result type for storage in heterogeneous nodes.
    pub(crate) fn erase(self) -> Task<BoxedValue> {
        let node = match self.node {
            Node::Pure(value) => Node::Pure(Box::new(value) as BoxedValue),
            Node::Fail(error) => Node::Fail(error),
            Node::Suspend(thunk) => Node::Suspend(Box::new(move || thunk().erase())),
            Node::Effect { effect, resume } => Node::Effect {
                effect,
                resume: Box::new(move |outcome| resume(outcome).erase()),
            },
            Node::Bind { first, resume } => Node::Bind {
                first,
                resume: Box::new(move |value| resume(value).erase()),
            },
            Node::Parallel { branches, resume } => Node::Parallel {
                branches,
                resume: Box::new(move |values| resume(values).erase()),
            },
            Node::Race { branches, resume } => Node::Race {
                branches,
                resume: Box::new(move |value| resume(value).erase()),
            },
            Node::Recover { attempt, rescue } => Node::Recover {
                attempt: Box::new(attempt.erase()),
                rescue: Box::new(move |error| rescue(error).erase()),
            },
        };
        Task { node }
    }
}
