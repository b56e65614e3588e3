mod filter_panel;
mod nav_bar;
mod task_form;
mod task_list;
mod task_list_row;

pub use filter_panel::FilterPanel;
pub use nav_bar::NavBar;
pub use task_form::{
  LocalTaskFormPanel,
  RemoteTaskFormPanel
};
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
