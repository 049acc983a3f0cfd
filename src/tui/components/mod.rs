//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: bot name, status and the "↓ New" indicator
//! - `Message`: one chat bubble
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: multi-line composer with auto-resize and error flash
//! - `MessageList`: scrollable transcript with layout caching
//!
//! Components receive external data as props rather than reading `App`
//! directly, which keeps dependencies explicit and components testable:
//!
//! ```rust,ignore
//! TitleBar::new(app.bot_name.clone(), app.status_message.clone(), unseen).render(frame, area);
//! ```
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable transcript)
//! └── input_box/       (Composer)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
