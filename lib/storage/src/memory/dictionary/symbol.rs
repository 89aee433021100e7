use quadstore_encoding::{
    ensure_encodable, DictionaryError, DictionaryResult, Symbol, TermDictionary,
};
use quadstore_model::Term;

/// A dictionary that encodes terms as interned [Symbol]s of their canonical string form.
///
/// The dictionary itself is stateless. All state lives in the process-wide interner, which is why
/// [TermDictionary::encodings] and quoted triples are not supported.
#[derive(Debug, Clone, Copy)]
pub struct SymbolDictionary {
    default_graph: Symbol,
}

impl SymbolDictionary {
    pub fn new() -> Self {
        Self {
            default_graph: Symbol::intern(&Term::DefaultGraph.to_string()),
        }
    }

    /// Returns the encoding of the default graph.
    pub fn default_graph(&self) -> Symbol {
        self.default_graph
    }
}

impl Default for SymbolDictionary {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_plain(term: &Term) -> DictionaryResult<()> {
    ensure_encodable(term)?;
    if term.as_triple().is_some() {
        return Err(DictionaryError::Unsupported(
            "A symbol dictionary does not support quoted triples.".to_owned(),
        ));
    }
    Ok(())
}

impl TermDictionary for SymbolDictionary {
    type Encoding = Symbol;

    fn encode(&self, term: &Term) -> DictionaryResult<Symbol> {
        ensure_plain(term)?;
        Ok(Symbol::intern(&term.to_string()))
    }

    fn encode_optional(&self, term: &Term) -> DictionaryResult<Option<Symbol>> {
        ensure_plain(term)?;
        Ok(Symbol::lookup(&term.to_string()))
    }

    fn decode(&self, encoding: Symbol) -> DictionaryResult<Term> {
        match encoding.as_str().parse::<Term>() {
            Ok(term) if ensure_plain(&term).is_ok() => Ok(term),
            _ => Err(DictionaryError::not_found(format!("{encoding:?}"))),
        }
    }

    fn encodings(&self) -> DictionaryResult<Vec<Symbol>> {
        Err(DictionaryError::Unsupported(
            "A symbol dictionary cannot enumerate its encodings.".to_owned(),
        ))
    }
}
