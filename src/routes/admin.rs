//! Admin page listing registered users. The guard only hides the page; the
//! endpoint itself rejects non-admin tokens.

use crate::{
    app::use_app,
    components::{Alert, AlertKind, AppShell, Spinner},
    features::auth::{
        client,
        guards::{RequireAccess, paths, route_access},
    },
};
use leptos::prelude::*;

#[component]
pub fn AdminPage() -> impl IntoView {
    view! {
        <AppShell>
            <RequireAccess access=route_access(paths::ADMIN)>
                <UsersTable />
            </RequireAccess>
        </AppShell>
    }
}

#[component]
fn UsersTable() -> impl IntoView {
    let app = use_app();
    let users = LocalResource::new(move || {
        let ctx = app.get_value();
        async move { client::list_users(&ctx.gateway).await }
    });

    view! {
        <div class="space-y-6">
            <div class="space-y-1">
                <h1 class="text-2xl font-semibold text-gray-900 dark:text-white">"Users"</h1>
                <p class="text-sm text-gray-500 dark:text-gray-400">
                    "All registered accounts."
                </p>
            </div>

            <div class="overflow-hidden bg-white dark:bg-gray-800 shadow-sm border border-gray-200 dark:border-gray-700 rounded-lg">
                <table class="min-w-full divide-y divide-gray-200 dark:divide-gray-700">
                    <thead class="bg-gray-50 dark:bg-gray-900/50">
                        <tr>
                            <th scope="col" class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">
                                "Username"
                            </th>
                            <th scope="col" class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">
                                "Role"
                            </th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-gray-200 dark:divide-gray-700">
                        {move || match users.get() {
                            Some(Ok(list)) if list.is_empty() => view! {
                                <tr>
                                    <td colspan="2" class="px-6 py-12 text-center text-sm text-gray-500 dark:text-gray-400">
                                        "No users found."
                                    </td>
                                </tr>
                            }
                            .into_any(),
                            Some(Ok(list)) => list
                                .into_iter()
                                .map(|user| {
                                    let role = if user.is_admin { "Admin" } else { "User" };
                                    view! {
                                        <tr class="hover:bg-gray-50 dark:hover:bg-gray-700/50 transition-colors">
                                            <td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900 dark:text-white">
                                                {user.username}
                                            </td>
                                            <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500 dark:text-gray-400">
                                                {role}
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                                .into_any(),
                            Some(Err(err)) => view! {
                                <tr>
                                    <td colspan="2" class="px-6 py-4">
                                        <Alert kind=AlertKind::Error message=err.to_string() />
                                    </td>
                                </tr>
                            }
                            .into_any(),
                            None => view! {
                                <tr>
                                    <td colspan="2" class="px-6 py-12 text-center">
                                        <Spinner />
                                    </td>
                                </tr>
                            }
                            .into_any(),
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
