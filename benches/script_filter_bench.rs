use criterion::{black_box, criterion_group, criterion_main, Criterion};
use malayalam_extract::filtering::ScriptFilter;
use malayalam_extract::transformers::strip_markup;

// mixed page: malayalam paragraphs, english navigation, scripts
fn page(paragraphs: usize) -> String {
    let mut html = String::from(
        "<html><head><title>വാർത്ത</title><script>var tracking = {id: 1};</script></head><body>",
    );
    html.push_str("<nav><a href=\"/\">Home</a> | <a href=\"/news\">News</a></nav>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>കേരളത്തിലെ ഔദ്യോഗിക ഭാഷയാണ് മലയാളം, ഇത് {} ആം ഖണ്ഡിക. Read more &raquo;</p>",
            i
        ));
    }
    html.push_str("</body></html>");
    html
}

pub fn strip(c: &mut Criterion) {
    let html = page(200);
    c.bench_function("strip_markup 200 paragraphs", |b| {
        b.iter(|| strip_markup(black_box(&html)))
    });
}

pub fn segments(c: &mut Criterion) {
    let text = strip_markup(&page(200));
    let filter = ScriptFilter::default();
    c.bench_function("script filter 200 paragraphs", |b| {
        b.iter(|| filter.segments(black_box(&text)))
    });
}

criterion_group!(benches, strip, segments);
criterion_main!(benches);
