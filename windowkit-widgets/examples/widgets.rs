use rand::SeedableRng;
use rand::rngs::StdRng;
use windowkit_widgets::{
    Autocomplete, CharClass, Dialog, DialogKey, DialogOptions, PageButton, Pagination,
    PasswordGenerator, PasswordOptions, Product, SearchKey,
};

fn main() {
    // Example: the synchronous widgets driven by scripted input.
    let products: Vec<Product> = ["Mens Cotton Jacket", "Rain Jacket", "Gold Ring"]
        .iter()
        .enumerate()
        .map(|(i, title)| Product {
            id: i as u64 + 1,
            title: (*title).to_owned(),
            price: 9.5 * (i + 1) as f64,
            image: String::new(),
        })
        .collect();

    let mut search = Autocomplete::default();
    search.input("jacket");
    search.apply_filter("jacket", &products);
    search.handle_key(SearchKey::Down);
    println!("search: {:?}", search.handle_key(SearchKey::Enter));

    let mut dialog = Dialog::new(DialogOptions::default().with_close_button(true), vec![1, 2]);
    dialog.open(Some(100));
    for _ in 0..4 {
        println!("dialog tab: {:?}", dialog.handle_key(DialogKey::Tab));
    }
    println!("dialog escape: {:?}", dialog.handle_key(DialogKey::Escape));

    let mut pages = Pagination::new(4).with_on_page_change(|page| println!("page -> {page}"));
    pages.next();
    pages.select(9);
    let labels: Vec<String> = pages
        .buttons()
        .into_iter()
        .map(|b| match b {
            PageButton::Previous { disabled } => format!("<{}", if disabled { "x" } else { "" }),
            PageButton::Page { number, active } => {
                if active {
                    format!("[{number}]")
                } else {
                    number.to_string()
                }
            }
            PageButton::Next { disabled } => format!("{}>", if disabled { "x" } else { "" }),
        })
        .collect();
    println!("pagination: {}", labels.join(" "));

    let mut generator = PasswordGenerator::new(
        PasswordOptions::default()
            .with_class(CharClass::Uppercase, true)
            .with_length(16),
    );
    let mut rng = StdRng::seed_from_u64(42);
    println!("password: {}", generator.generate_with(&mut rng));
}
