//! IDE features: high-level queries for editor requests.
//!
//! Each function answers one request from the artifacts the scheduler
//! recorded on documents and the entity graph. Nothing here parses or
//! mutates; results are only as fresh as the last finished batch.
//!
//! ## Usage
//!
//! ```ignore
//! use mythic::ide;
//!
//! let hover = ide::hover(&host, &uri, position);
//! let tokens = ide::encode(&ide::semantic_tokens(&host, &uri));
//! ```

mod analysis;
mod completion;
mod debug;
mod goto;
mod hover;
mod references;
mod semantic_tokens;
mod symbols;

pub use analysis::Analysis;
pub use completion::{completions, CompletionItem, CompletionItemKind, CompletionList};
pub use debug::{dependency_report, document_stats, DependencyReport, EntityEdges};
pub use goto::{goto_definition, GotoResult, GotoTarget};
pub use hover::{hover, HoverResult};
pub use references::{find_references, Reference};
pub use semantic_tokens::{encode, legend, semantic_tokens, SemanticToken, TokenType};
pub use symbols::{document_symbols, workspace_symbols, SymbolInfo};
