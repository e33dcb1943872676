//! Command handlers

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use belle_client::BelleClient;
use belle_client::services::USERNAME_TAKEN_MESSAGE;
use belle_client::sync::ApplyOutcome;
use belle_client::types::{FetchOutcome, OpResult};
use serde_json::json;
use shared::util::format_brl;
use shared::{
    DateRange, LoginCredentials, PaymentMethod, PaymentSeries, PeriodFilter, ProductForm,
    SaleFilter, SaleForm, SalesStats, Serialize, UserForm, UserSearch, UserUpdate,
};

use crate::cli::{ChartsArgs, ProductArgs, ProductsCommand, SalesCommand, UsersCommand};

/// Ask before a destructive action. `--yes` skips the prompt.
fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [s/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes"))
}

fn read_password() -> Result<String> {
    print!("Senha: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ensure_fetched(outcome: FetchOutcome) -> Result<()> {
    match outcome {
        FetchOutcome::Loaded(_) => Ok(()),
        FetchOutcome::Failed(message) => Err(anyhow!(message)),
        other => Err(anyhow!("Falha ao carregar dados ({:?})", other)),
    }
}

fn ensure_ok(result: OpResult, done: &str) -> Result<()> {
    if result.success {
        println!("{}", done);
        Ok(())
    } else {
        Err(anyhow!(result.error.unwrap_or_else(|| "Operação falhou".into())))
    }
}

pub async fn login(
    client: &BelleClient,
    username: String,
    password: Option<String>,
    as_json: bool,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    client.session().set_on_login_page(true);
    let auth = client.auth_store();
    let result = auth.login(LoginCredentials { username, password }).await;
    client.session().set_on_login_page(false);

    if !result.success {
        bail!(result.error.unwrap_or_else(|| "Erro ao fazer login".into()));
    }
    let user = auth.user().await.context("Sessão sem usuário")?;
    if as_json {
        return print_json(&user);
    }
    println!("Bem-vindo(a), {} ({})", user.nome, user.roles.label());
    Ok(())
}

pub async fn logout(client: &BelleClient) -> Result<()> {
    client.auth_store().logout().await;
    println!("Sessão encerrada");
    Ok(())
}

pub async fn whoami(client: &BelleClient, as_json: bool) -> Result<()> {
    let auth = client.auth_store();
    auth.initialize().await;
    let Some(user) = auth.user().await else {
        bail!("Nenhuma sessão ativa. Use `belle login`.");
    };
    if as_json {
        return print_json(&user);
    }
    println!("{} <{}> - {}", user.nome, user.username, user.roles.label());
    Ok(())
}

pub async fn sales(client: &BelleClient, command: SalesCommand, as_json: bool) -> Result<()> {
    let store = client.sales_store();
    match command {
        SalesCommand::List { pagamento, produto } => {
            ensure_fetched(store.fetch_all().await)?;
            let filter = SaleFilter {
                forma_pagamento: pagamento,
                nome_produto: produto,
            };
            let sales = store.filtered(&filter).await;
            let stats = store.stats().await;
            if as_json {
                return print_json(&json!({ "vendas": sales, "stats": stats }));
            }
            for sale in &sales {
                println!(
                    "{:<12} {:<30} {:>4} x {:>12} = {:>12}  {}",
                    sale.id,
                    sale.nome_produto,
                    sale.quantidade,
                    format_brl(sale.preco),
                    format_brl(sale.total),
                    sale.forma_pagamento.label()
                );
            }
            println!(
                "\n{} vendas | {} produtos | total {} | conclusão {}%",
                stats.vendas_realizadas,
                stats.produtos_vendidos,
                format_brl(stats.total_vendido),
                stats.taxa_conclusao
            );
            Ok(())
        }
        SalesCommand::Add(args) => {
            let form = SaleForm::new(args.produto, args.preco, args.quantidade, args.pagamento);
            form.validate()?;
            let total = form.total();
            ensure_ok(
                store.create(form).await,
                &format!("Venda registrada ({})", format_brl(total)),
            )
        }
        SalesCommand::Update {
            id,
            produto,
            preco,
            quantidade,
            pagamento,
        } => {
            let current = store
                .get(&id)
                .await
                .with_context(|| format!("Venda {} não encontrada", id))?;
            let mut form = SaleForm::from_sale(&current);
            if let Some(produto) = produto {
                form.nome_produto = produto;
            }
            if let Some(preco) = preco {
                form.set_preco(preco);
            }
            if let Some(quantidade) = quantidade {
                form.set_quantidade(quantidade);
            }
            if let Some(pagamento) = pagamento {
                form.forma_pagamento = pagamento;
            }
            form.validate()?;
            ensure_ok(store.update(&id, form).await, "Venda atualizada")
        }
        SalesCommand::Delete { id, yes } => {
            if !confirm(&format!("Excluir a venda {}?", id), yes)? {
                println!("Cancelado");
                return Ok(());
            }
            ensure_ok(store.delete(&id).await, "Venda excluída")
        }
        SalesCommand::Period { inicio, fim } => {
            DateRange::parse(&inicio, &fim)?;
            let sales = store
                .by_period(&inicio, &fim)
                .await
                .map_err(|e| anyhow!(e.message))?;
            if as_json {
                return print_json(&sales);
            }
            let stats = SalesStats::from_sales(&sales);
            println!(
                "{} vendas entre {} e {}: {}",
                stats.vendas_realizadas,
                inicio,
                fim,
                format_brl(stats.total_vendido)
            );
            Ok(())
        }
    }
}

pub async fn users(client: &BelleClient, command: UsersCommand, as_json: bool) -> Result<()> {
    let store = client.users_store();
    match command {
        UsersCommand::List {
            nome,
            username,
            role,
        } => {
            let filters = UserSearch {
                nome,
                username,
                roles: role,
            };
            let users = store.search(&filters).await.map_err(|e| anyhow!(e.message))?;
            if as_json {
                return print_json(&users);
            }
            for user in &users {
                println!(
                    "{:<12} {:<30} {:<20} {}",
                    user.id_user,
                    user.nome,
                    user.username,
                    user.roles.label()
                );
            }
            Ok(())
        }
        UsersCommand::Add {
            nome,
            username,
            password,
            role,
        } => {
            let form = UserForm {
                nome,
                username,
                password,
                roles: role,
            };
            form.validate()?;
            if !store.validate_username(&form.username, None).await {
                bail!(USERNAME_TAKEN_MESSAGE);
            }
            ensure_ok(store.create(form).await, "Usuário criado")
        }
        UsersCommand::Update {
            id,
            nome,
            username,
            password,
            role,
        } => {
            if let Some(username) = &username
                && !store.validate_username(username, Some(&id)).await
            {
                bail!(USERNAME_TAKEN_MESSAGE);
            }
            let update = UserUpdate {
                nome,
                username,
                password,
                roles: role,
            };
            ensure_ok(store.update(&id, update).await, "Usuário atualizado")
        }
        UsersCommand::Delete { id, yes } => {
            if !confirm(&format!("Excluir o usuário {}?", id), yes)? {
                println!("Cancelado");
                return Ok(());
            }
            ensure_ok(store.delete(&id).await, "Usuário excluído")
        }
        UsersCommand::Check { username, exclude } => {
            let available = store.validate_username(&username, exclude.as_deref()).await;
            if as_json {
                return print_json(&json!({ "username": username, "available": available }));
            }
            if available {
                println!("'{}' está disponível", username);
            } else {
                println!("'{}' já está em uso", username);
            }
            Ok(())
        }
    }
}

fn product_form(args: ProductArgs) -> Result<ProductForm> {
    let form = ProductForm {
        nome_produto: args.nome,
        preco: args.preco,
        quantidade: args.quantidade,
        descricao: args.descricao,
    };
    form.validate()?;
    Ok(form)
}

pub async fn products(client: &BelleClient, command: ProductsCommand, as_json: bool) -> Result<()> {
    let store = client.products_store();
    match command {
        ProductsCommand::List { search } => {
            let products = match search {
                Some(name) => store.search(&name).await.map_err(|e| anyhow!(e.message))?,
                None => {
                    ensure_fetched(store.fetch_all().await)?;
                    store.items().await
                }
            };
            if as_json {
                return print_json(&products);
            }
            for product in &products {
                println!(
                    "{:<12} {:<30} {:>12} {:>6} un.",
                    product.id_produto,
                    product.nome_produto,
                    format_brl(product.preco),
                    product.quantidade
                );
            }
            Ok(())
        }
        ProductsCommand::Add(args) => {
            ensure_ok(store.create(product_form(args)?).await, "Produto criado")
        }
        ProductsCommand::Update { id, product } => {
            ensure_ok(
                store.update(&id, product_form(product)?).await,
                "Produto atualizado",
            )
        }
        ProductsCommand::Delete { id, yes } => {
            if !confirm(&format!("Excluir o produto {}?", id), yes)? {
                println!("Cancelado");
                return Ok(());
            }
            ensure_ok(store.delete(&id).await, "Produto excluído")
        }
    }
}

pub async fn charts(client: &BelleClient, args: ChartsArgs, as_json: bool) -> Result<()> {
    let filter = match (args.periodo, args.inicio, args.fim) {
        (_, Some(inicio), Some(fim)) => PeriodFilter::custom(inicio, fim),
        (Some(preset), _, _) => PeriodFilter::preset(preset),
        _ => PeriodFilter::default(),
    };

    let store = client.chart_store();
    match store.apply_filter(filter).await {
        ApplyOutcome::Applied => {}
        ApplyOutcome::InvalidPeriod(message) | ApplyOutcome::Failed(message) => bail!(message),
        ApplyOutcome::Ignored => bail!("Carregamento já em andamento"),
    }

    let state = store.snapshot().await;
    if as_json {
        return print_json(&json!({
            "periodo": store.period_summary().await,
            "labels": PaymentSeries::labels(),
            "quantidade": state.pizza.map(|s| *s.values()),
            "valor": state.total_vendas.map(|s| *s.values()),
            "stats": state.stats,
        }));
    }

    println!("Período: {}", store.period_summary().await);
    let (Some(counts), Some(totals)) = (state.pizza, state.total_vendas) else {
        println!("Sem dados para o período");
        return Ok(());
    };
    let shares = counts.percentages();
    for (i, method) in PaymentMethod::ALL.iter().enumerate() {
        println!(
            "{:<10} {:>6} vendas ({:>6.2}%)  {:>12.2}",
            method.label(),
            counts.values()[i],
            shares[i],
            totals.values()[i]
        );
    }
    if let Some(stats) = state.stats {
        println!(
            "\nTotal vendido: {:.2} | Vendas: {} | Produtos (estimado): {} | Mais usada: {}",
            stats.total_vendido,
            stats.vendas_realizadas,
            stats.produtos_vendidos,
            stats.forma_pagamento_mais_usada
        );
    }
    Ok(())
}
