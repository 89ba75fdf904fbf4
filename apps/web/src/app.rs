//! Main Application Component

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::pages::Dashboard;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Driver Tracking Dashboard" />
        <Meta name="description" content="Live map of delivery drivers sharing their location" />

        <Router>
            <main>
                <Routes>
                    <Route path="/" view=Dashboard />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="card empty">
            <h1>"404"</h1>
            <p>"Page not found"</p>
            <A href="/">"Back to the map"</A>
        </div>
    }
}
