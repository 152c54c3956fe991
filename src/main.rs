use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;

use threads_private_api::{ApiConfig, Credentials, ThreadsClient};

#[derive(Parser, Debug)]
#[command(author, version, about = "Threads 私有接口命令行工具", long_about = None)]
struct Args {
    #[arg(short, long, help = "用户名")]
    username: Option<String>,

    #[arg(short, long, help = "密码")]
    password: Option<String>,

    #[arg(
        long,
        default_value = "https://i.instagram.com/api/v1",
        help = "API 基础URL"
    )]
    api_url: String,

    #[arg(
        long,
        default_value = "https://www.instagram.com",
        help = "图片上传基础URL"
    )]
    upload_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 查询用户ID（无需登录）
    UserId { username: String },
    /// 获取用户信息
    User { id: u64 },
    /// 搜索用户
    Search { query: String },
    /// 粉丝列表
    Followers { id: u64 },
    /// 关注列表
    Following { id: u64 },
    /// 关注用户
    Follow { id: u64 },
    /// 取消关注
    Unfollow { id: u64 },
    /// 获取帖子及回复
    Thread { id: u64 },
    /// 帖子点赞列表
    Likers { id: u64 },
    /// 发帖
    Post {
        caption: String,

        #[arg(long, help = "附件链接", conflicts_with = "image")]
        url: Option<String>,

        #[arg(long, help = "图片 URL 或本地路径")]
        image: Option<String>,

        #[arg(long, help = "回复的帖子ID")]
        reply_to: Option<u64>,
    },
    /// 删除帖子
    Delete { id: u64 },
    /// 点赞帖子
    Like { id: u64 },
    /// 取消点赞
    Unlike { id: u64 },
}

async fn run(client: &ThreadsClient, command: Command) -> Result<Value> {
    let value = match command {
        Command::UserId { username } => Value::from(client.get_user_id(&username).await?),
        Command::User { id } => client.get_user(id).await?,
        Command::Search { query } => client.search_user(&query).await?,
        Command::Followers { id } => client.get_user_followers(id).await?,
        Command::Following { id } => client.get_user_following(id).await?,
        Command::Follow { id } => client.follow_user(id).await?,
        Command::Unfollow { id } => client.unfollow_user(id).await?,
        Command::Thread { id } => client.get_thread(id).await?,
        Command::Likers { id } => client.get_thread_likers(id).await?,
        Command::Post {
            caption,
            url,
            image,
            reply_to,
        } => {
            client
                .create_thread(&caption, url.as_deref(), image.as_deref(), reply_to)
                .await?
        }
        Command::Delete { id } => client.delete_thread(id).await?,
        Command::Like { id } => client.like_thread(id).await?,
        Command::Unlike { id } => client.unlike_thread(id).await?,
    };

    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 使用 env_logger::Builder 来设置默认日志级别
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = ApiConfig::with_base_urls(args.api_url, args.upload_url);
    let client = ThreadsClient::new(config)?;

    let client = match (&args.command, args.username, args.password) {
        (Command::UserId { .. }, _, _) => client,
        (_, Some(username), Some(password)) => {
            let logged_in = client.login(&Credentials::new(username, password)).await?;
            if let Some(session) = logged_in.session() {
                info!("登录成功: {} (user_id={})", session.username, session.user_id);
            }
            logged_in
        }
        _ => return Err(anyhow!("该命令需要提供 --username 和 --password")),
    };

    let value = run(&client, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
