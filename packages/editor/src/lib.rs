//! # Quire Editor
//!
//! Document model and editing engine for the Quire rich-text editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ binding layer: input events → EditCommand   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: EditSession                        │
//! │  - Apply commands to the current state      │
//! │  - Undo/redo history with typing coalescing │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mutations: EditorState → EditorState        │
//! │  - insertText / insertParagraph             │
//! │  - deleteContent{Backward,Forward}          │
//! │  - deleteSelectedRange                      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: immutable Doc + split/merge       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are values**: every edit returns a new `Doc`; old ones stay valid
//! 2. **Identity is stable**: a node keeps its id across edits and moves
//! 3. **Split and merge are inverses**: structural edits are built from them
//! 4. **Positions are (node, offset)**: offsets count characters in text
//!    nodes and children everywhere else
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_editor::{EditCommand, EditSession, EditorState};
//!
//! let mut session = EditSession::new("main", EditorState::empty());
//! session.apply(EditCommand::InsertText { text: "Hello".into() })?;
//! session.apply(EditCommand::InsertParagraph)?;
//!
//! let json = quire_editor::to_json(session.doc())?;
//! session.undo();
//! ```

mod config;
mod cursor;
mod document;
mod errors;
mod mutations;
mod node;
mod serializer;
mod session;
mod split;
mod state;
mod undo_stack;
mod visitor;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use cursor::Cursor;
pub use document::Doc;
pub use errors::EditorError;
pub use mutations::{
    delete_and_merge, delete_content_backward, delete_content_forward, delete_selected_range,
    insert_paragraph, insert_text, EditCommand,
};
pub use node::{Node, NodeKind, NodeType};
pub use serializer::{
    from_json, from_tree, to_json, to_tree, NodeConstructor, NodeRegistry, TreeNode,
};
pub use session::EditSession;
pub use split::{merge, split, MergeResult, SplitResult};
pub use state::EditorState;
pub use undo_stack::{HistoryEntry, UndoStack};
pub use visitor::{walk_doc, walk_node, NodeStats, Visitor};

// Re-export common types for convenience
pub use quire_common::{Address, DocError, DocResult, NodeId, Position};
