use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::{
  Link,
  use_route
};

use crate::app::Route;

#[function_component(NavBar)]
pub fn nav_bar() -> Html {
  let current = use_route::<Route>()
    .unwrap_or(Route::Remote);
  let class_for = |route: Route| {
    if current == route {
      "item active"
    } else {
      "item"
    }
  };

  html! {
      <nav class="panel nav">
          <div class="header">{ "Tareas" }</div>
          <Link<Route> classes={class_for(Route::Remote)} to={Route::Remote}>
              { "Server tasks" }
          </Link<Route>>
          <Link<Route> classes={class_for(Route::Local)} to={Route::Local}>
              { "Browser tasks" }
          </Link<Route>>
      </nav>
  }
}
