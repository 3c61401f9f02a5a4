//! HTML rendering with maud compile-time templates.
//!
//! All interpolated values (post content, user names) are HTML-escaped by
//! maud at render time; a post containing `<script>` reaches the browser as
//! text, never as markup. The one-time token is embedded as a hidden field
//! in every mutation form on the page.

use board_core::ADMIN_USER;
use maud::{DOCTYPE, Markup, html};

use crate::store::Post;

/// Renders the feed page: post form plus the reverse-chronological feed.
///
/// `one_time_token` must accompany the next mutating request; it is embedded
/// in the create form and in each delete form.
#[must_use]
pub fn posts_page(posts: &[Post], user: &str, one_time_token: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Secret board" }
            }
            body {
                h1 { "Secret board" }
                p { "Posting as " b { (user) } " — " a href="/logout" { "log out" } }
                form method="post" action="/posts" {
                    textarea name="content" rows="4" cols="60" required {}
                    br;
                    input type="hidden" name="oneTimeToken" value=(one_time_token);
                    button type="submit" { "Post" }
                }
                hr;
                @if posts.is_empty() {
                    p { "No posts yet." }
                }
                @for post in posts {
                    article {
                        p { (post.content) }
                        footer {
                            small {
                                "#" (post.id)
                                " by " (post.posted_by)
                                " at " (post.created_at.format("%Y-%m-%d %H:%M:%S UTC"))
                            }
                            @if user == post.posted_by || user == ADMIN_USER {
                                form method="post" action="/posts/delete" {
                                    input type="hidden" name="id" value=(post.id);
                                    input type="hidden" name="oneTimeToken" value=(one_time_token);
                                    button type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                    hr;
                }
            }
        }
    }
}

/// Renders the logged-out page returned with a 401.
#[must_use]
pub fn logged_out_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            body {
                h1 { "Logged out." }
                a href="/posts" { "Log in" }
            }
        }
    }
}
