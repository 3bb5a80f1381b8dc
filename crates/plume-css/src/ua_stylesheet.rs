//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! Lengths are given in `px` since no other unit is resolved during layout;
//! `1em` is taken as `16px`.

use std::sync::OnceLock;

use crate::cascade::USER_AGENT_ORIGIN;
use crate::parser::{Stylesheet, parse_stylesheet};

/// [WHATWG HTML § 15.3](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
const UA_CSS: &str = r"
/* [§ 15.3.1 Hidden elements] */
area, base, basefont, datalist, head, link, meta, noembed,
noframes, param, rp, script, style, template, title {
    display: none;
}

/* [§ 15.3.3 Flow content] */
address, article, aside, blockquote, body, center, dd, details,
dialog, dir, div, dl, dt, fieldset, figcaption, figure, footer,
form, h1, h2, h3, h4, h5, h6, header, hgroup, hr, html, legend,
li, listing, main, menu, nav, ol, p, plaintext, pre, search,
section, summary, ul, xmp {
    display: block;
}

/* [§ 15.3.4 The page] */
body {
    margin: 8px;
}

/* [§ 15.3.5 Grouping content] */
p, listing, plaintext, pre, xmp {
    margin: 16px 0;
}

blockquote, figure {
    margin: 16px 40px;
}

/* [§ 15.3.6 Sections and headings] */
h1 {
    margin: 21px 0;
}

h2 {
    margin: 20px 0;
}

/* [§ 15.3.7 Lists] */
ol, ul, menu {
    margin: 16px 0;
    padding-left: 40px;
}

/* [§ 15.3.11 The hr element] */
hr {
    border: 1px inset gray;
    margin: 8px 0;
}
";

/// The built-in stylesheet, parsed on first use with [`USER_AGENT_ORIGIN`].
pub fn ua_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| {
        parse_stylesheet(UA_CSS, USER_AGENT_ORIGIN).unwrap_or_else(|error| {
            log::error!("user-agent stylesheet failed to tokenize: {error}");
            Stylesheet {
                origin: USER_AGENT_ORIGIN,
                ..Stylesheet::default()
            }
        })
    })
}
