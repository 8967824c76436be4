//! UI Components
//!
//! The two page views and the pieces of the todo page.

mod auth_view;
mod new_todo_form;
mod todo_list;
mod todo_row;
mod todo_view;
mod user_bar;

pub use auth_view::AuthView;
pub use new_todo_form::NewTodoForm;
pub use todo_list::TodoList;
pub use todo_row::TodoRowItem;
pub use todo_view::TodoView;
pub use user_bar::UserBar;
