#![cfg(test)]

pub const POST_DATA_MD: &str = "# What I learned after a year of devlogs
How do you keep a game project moving?

Someone asked me this today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

$IMAGE:{\"uri\":\"posts/devlog/board.png\",\"subtitle\":\"The task board\"}

## Non technical

### Have an honest image of your scope

You finished the prototype and it felt great.
It's common to think the rest is just content. It is not. __The earlier you find that, the better.__

## Technical

```csharp
public class Stairs : MonoBehaviour { }
```
";

pub const META_NO_DATE: &str = r#"{
  "title": "Introduction to my devblog",
  "description": "Welcome to my blog",
  "tags": "misc",
  "draft": false
}
"#;

pub const CONFIG_DATA: &str = r#"
[paths]
raw_posts_dir = "posts/raw-posts"
generated_dir = "posts/generated-posts"
index_file = "posts/index.ts"
feed_file = "public/RSS/feed.xml"

[templates]
post = "posts/post.template.txt"
meta = "posts/post.meta.template.txt"
index = "posts/index.template.txt"
feed = "public/RSS/feed.template.xml"

[feed]
home_url = "https://example.com/#/devblog/"
author = "Jane Doe"

[lint]
command = ["npm", "run", "lint"]
"#;

pub const POST_TEMPLATE: &str = "<template>
  <div class=\"post\">
{{POST_TEXT}}
  </div>
</template>
";

pub const META_TEMPLATE: &str = r#"import { Post } from "@/types";
import { markRaw } from "vue";
{{COMPONENT_IMPORT}};

const post: Post = markRaw({{META_DATA}});

export default post;
"#;

pub const INDEX_TEMPLATE: &str = r#"// Template file for generation
import { Post } from "@/types";
{{IMPORT_KEY}}

const posts: Array<Post> = [{{POSTS}}];
export default posts;
"#;

pub const FEED_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
<title>Devblog</title>
<link>https://example.com/#/devblog/</link>
<description>Game development posts</description>
{{ITEMS}}
</channel>
</rss>
"#;
