use std::collections::HashMap;
use std::fmt::Write as _;

use mpa_core::SupplierListing;

use super::icons::{candidates, SupplierIcon};
use super::{attr, esc, format_price};

/// The fallback chain for `domain`, starting at `resolved` when one is known.
fn icon_chain(domain: &str, resolved: Option<&SupplierIcon>) -> Vec<SupplierIcon> {
    let chain = candidates(domain);
    let Some(resolved) = resolved else {
        return chain;
    };
    match chain.iter().position(|c| c == resolved) {
        Some(at) => chain[at..].to_vec(),
        None => std::iter::once(resolved.clone())
            .chain(
                chain
                    .into_iter()
                    .filter(|c| !matches!(c, SupplierIcon::Favicon(_)) && c != resolved),
            )
            .collect(),
    }
}

fn icon_markup(chain: &[SupplierIcon]) -> String {
    let fallbacks = chain
        .iter()
        .skip(1)
        .map(SupplierIcon::token)
        .collect::<Vec<_>>()
        .join(" ");
    match chain.first() {
        Some(SupplierIcon::Favicon(url)) => format!(
            "<img class=\"supplier-icon\" src=\"{}\" alt=\"\" data-fallbacks=\"{}\">",
            attr(url),
            attr(&fallbacks)
        ),
        Some(SupplierIcon::Brand(brand)) => {
            format!("<span class=\"supplier-icon brand-icon brand-{brand}\"></span>")
        }
        _ => "<span class=\"supplier-icon generic-store-icon\"></span>".to_string(),
    }
}

#[must_use]
pub fn suppliers(listings: &[SupplierListing]) -> String {
    suppliers_with_icons(listings, &HashMap::new())
}

/// Like [`suppliers`], but each listing whose domain is in `icons` starts its
/// icon chain at the already resolved icon.
#[must_use]
pub fn suppliers_with_icons(
    listings: &[SupplierListing],
    icons: &HashMap<String, SupplierIcon>,
) -> String {
    if listings.is_empty() {
        return "<p class=\"empty-state\">No suppliers found for this part.</p>".to_string();
    }
    let mut out = String::from("<ul class=\"suppliers\">");
    for listing in listings {
        let _ = write!(
            out,
            "<li class=\"supplier\" data-domain=\"{}\">{}<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            attr(&listing.domain),
            icon_markup(&icon_chain(&listing.domain, icons.get(&listing.domain))),
            attr(&listing.url),
            esc(&listing.name)
        );
        if let Some(price) = &listing.price {
            let _ = write!(out, "<span class=\"price\">{}</span>", esc(&format_price(price)));
        }
        if let Some(rank) = listing.ai_ranking {
            let _ = write!(out, "<span class=\"ai-ranking\">#{rank}</span>");
        }
        if listing.purchasable {
            let _ = write!(
                out,
                "<button class=\"purchase-button\" data-supplier-url=\"{}\">Purchase</button>",
                attr(&listing.url)
            );
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(purchasable: bool) -> SupplierListing {
        SupplierListing {
            name: "Grainger".to_string(),
            url: "https://grainger.com/p/1".to_string(),
            price: Some("$1,024.5".to_string()),
            domain: "grainger.com".to_string(),
            ai_ranking: Some(2),
            purchasable,
        }
    }

    #[test]
    fn icon_lists_remaining_fallbacks_in_order() {
        let html = icon_markup(&icon_chain("grainger.com", None));
        assert!(html.starts_with(
            "<img class=\"supplier-icon\" src=\"https://www.google.com/s2/favicons?domain=grainger.com&amp;sz=64\""
        ));
        let fallbacks_at = html.find("data-fallbacks").unwrap();
        let faviconkit = html.find("api.faviconkit.com").unwrap();
        let brand = html.find("brand:grainger").unwrap();
        let generic = html.find(" generic\"").unwrap();
        assert!(fallbacks_at < faviconkit && faviconkit < brand && brand < generic);
    }

    #[test]
    fn resolved_icon_skips_providers_that_failed() {
        let mut icons = HashMap::new();
        icons.insert("grainger.com".to_string(), SupplierIcon::Brand("grainger"));
        let html = suppliers_with_icons(&[listing(false)], &icons);
        assert!(html.contains("<span class=\"supplier-icon brand-icon brand-grainger\"></span>"));
        assert!(!html.contains("google.com/s2"));

        let unresolved = suppliers_with_icons(&[listing(false)], &HashMap::new());
        assert_eq!(unresolved, suppliers(&[listing(false)]));
        assert!(unresolved.contains("google.com/s2"));
    }

    #[test]
    fn purchase_button_only_when_purchasable() {
        assert!(suppliers(&[listing(true)]).contains("purchase-button"));
        assert!(!suppliers(&[listing(false)]).contains("purchase-button"));
    }

    #[test]
    fn price_is_formatted() {
        assert!(suppliers(&[listing(false)]).contains("<span class=\"price\">$1024.50</span>"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let listings = vec![listing(true), listing(false)];
        assert_eq!(suppliers(&listings), suppliers(&listings));
    }
}
