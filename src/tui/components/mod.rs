//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: Connection state, status text and the jump-to-latest control
//! - `Message`: A single feed message
//!
//! ### Stateful Components (Event-Driven)
//!
//! Transient views over persistent state that also handle events:
//! - `MessageList` / `MessageListState`: Scrollable feed with layout caching
//! - `InputBox` / `InputEditor` / `InputBoxState`: The composer
//!
//! Components receive external data as props rather than reaching into `App`,
//! so dependencies stay explicit and every component can be rendered against a
//! `TestBackend` in isolation.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable feed)
//! └── input_box/       (Composer input, cursor, wrapping)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputBoxState, InputEditor, InputEvent};
pub mod message_list;
pub use message_list::{ListEvent, MessageList, MessageListState};
