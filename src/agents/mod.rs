//! Agent System
//!
//! Model-backed assistants behind the editing endpoints:
//!
//! - **Editor Agent**: editorial analysis with highlighted issues, falling
//!   back to the rule-based analyzer
//! - **Legal Advisor**: free-form legal review of a document
//! - **Document Colleague**: conversational Q&A about a document
//!
//! ## Analysis Flow
//!
//! ```text
//! Document text
//!      │
//!      ▼
//! ┌─────────────┐   unavailable / error / bad JSON   ┌─────────────┐
//! │   Editor    │ ─────────────────────────────────▶ │ Rule-based  │
//! │   Agent     │                                    │  Analyzer   │
//! └─────────────┘                                    └─────────────┘
//!      │                                                    │
//!      ▼                                                    ▼
//!  AI issues + insights                           catalog issues
//! ```

pub mod advisor;
pub mod colleague;
pub mod editor;

pub use advisor::LegalAdvisor;
pub use colleague::DocumentColleague;
pub use editor::{AiInsights, AppealScore, DocumentIntelligence, EditorAgent, EditorReport, Engine};
