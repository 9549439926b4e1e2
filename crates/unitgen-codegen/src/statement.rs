/// A statement in the body of a generated function.
///
/// Expressions are target-language text. Each emitter renders the statement
/// shapes in its own syntax, so block structure and indentation come from
/// the emitter and the [`crate::EmitContext`], never from the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementIR {
    /// Declaration with an initializer: `name := value`, `const name = value;`
    Let { name: String, value: String },

    /// Assignment: `target = value`
    Assign { target: String, value: String },

    /// Return statement. A multi-line value keeps its relative nesting.
    Return { value: String },

    /// Conditional without an else branch
    If {
        condition: String,
        then_: Vec<StatementIR>,
    },

    /// Loop over the elements of `iterable`, each bound to `binding`
    For {
        binding: String,
        iterable: String,
        body: Vec<StatementIR>,
    },
}

impl StatementIR {
    pub fn let_(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Let {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn assign(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Assign {
            target: target.into(),
            value: value.into(),
        }
    }

    pub fn ret(value: impl Into<String>) -> Self {
        Self::Return {
            value: value.into(),
        }
    }

    pub fn if_(condition: impl Into<String>, then_: Vec<StatementIR>) -> Self {
        Self::If {
            condition: condition.into(),
            then_,
        }
    }

    pub fn for_(
        binding: impl Into<String>,
        iterable: impl Into<String>,
        body: Vec<StatementIR>,
    ) -> Self {
        Self::For {
            binding: binding.into(),
            iterable: iterable.into(),
            body,
        }
    }
}
